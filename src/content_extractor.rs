//! Core content extraction algorithm (`grabArticle`).
//!
//! Each attempt runs on a fresh clone of the prepared document. When the
//! cleaned article is shorter than the character threshold, the next
//! attempt drops one more heuristic flag; after the last flag the page is
//! declared to have no article.

use crate::cleaner::ArticleCleaner;
use crate::constants::{
    ParseFlags, ALTER_TO_DIV_EXCEPTIONS, DEFAULT_TAGS_TO_SCORE, EMPTY_BLOCK_TAGS,
    MIN_CONTENT_TEXT_LENGTH, REGEXPS, UNLIKELY_ROLES,
};
use crate::dom::{Document, DomError, NodeId};
use crate::dom_utils::{
    get_inner_text, get_link_density, get_node_ancestors, has_ancestor_tag,
    has_child_block_element, has_single_tag_inside_element, is_element_without_content,
    is_phrasing_content, is_probably_visible, is_whitespace, match_string, next_node,
    remove_and_get_next,
};
use crate::options::ReadabilityOptions;
use crate::scoring::{initialize_node_score, paragraph_score, score_divider};
use crate::utils::char_len;
use std::collections::HashMap;

/// Flag sets tried in order.
const FLAG_LADDER: [ParseFlags; 4] = [
    ParseFlags::all(),
    ParseFlags::WEIGHT_CLASSES.union(ParseFlags::CLEAN_CONDITIONALLY),
    ParseFlags::CLEAN_CONDITIONALLY,
    ParseFlags::empty(),
];

/// Ancestors of a scored paragraph that share its score.
const SCORE_ANCESTOR_DEPTH: usize = 3;

/// Alternative candidates needed before promoting to their common parent.
const MINIMUM_TOP_CANDIDATES: usize = 3;

/// The article found by [`grab_article`].
///
/// `content` is a detached container inside `document` holding one
/// `<div id="readability-page-1" class="page">`.
#[derive(Debug)]
pub struct ExtractedArticle {
    pub document: Document,
    pub content: NodeId,
    pub text_length: usize,
    pub dir: Option<String>,
    pub byline: Option<String>,
}

/// Main content extraction algorithm with retry logic.
///
/// `document` is left untouched; each attempt works on its own clone.
/// `Ok(None)` means no attempt reached the character threshold.
pub fn grab_article(
    document: &Document,
    title: &str,
    options: &ReadabilityOptions,
) -> Result<Option<ExtractedArticle>, DomError> {
    let mut byline = None;

    for flags in FLAG_LADDER {
        let mut doc = document.clone();
        let mut attempt = Attempt {
            doc: &mut doc,
            options,
            flags,
            title,
            byline: &mut byline,
            scores: HashMap::new(),
        };

        let Some(result) = attempt.run()? else {
            debug_log!(options, "no candidate with flags {flags:?}");
            continue;
        };
        if result.text_length < options.char_threshold {
            debug_log!(
                options,
                "article too short with flags {flags:?}: {} < {}",
                result.text_length,
                options.char_threshold
            );
            continue;
        }

        return Ok(Some(ExtractedArticle {
            document: doc,
            content: result.content,
            text_length: result.text_length,
            dir: result.dir,
            byline,
        }));
    }

    Ok(None)
}

struct AttemptResult {
    content: NodeId,
    text_length: usize,
    dir: Option<String>,
}

/// One pass of scoring, selection and assembly under a fixed flag set.
struct Attempt<'a> {
    doc: &'a mut Document,
    options: &'a ReadabilityOptions,
    flags: ParseFlags,
    title: &'a str,
    byline: &'a mut Option<String>,
    scores: HashMap<NodeId, f64>,
}

impl<'a> Attempt<'a> {
    fn run(&mut self) -> Result<Option<AttemptResult>, DomError> {
        let Some(page) = self.doc.body() else {
            return Ok(None);
        };

        let elements_to_score = self.collect_elements_to_score();
        let candidates = self.score_elements(&elements_to_score);
        let top_candidates = self.select_top_candidates(&candidates);

        let (top_candidate, created) = match top_candidates.first() {
            Some(&candidate) if self.doc.local_name(candidate) != "body" => {
                (self.promote_candidate(candidate, &top_candidates), false)
            }
            _ => (self.wrap_page(page)?, true),
        };
        debug_log!(
            self.options,
            "top candidate <{}> score {:.2}",
            self.doc.local_name(top_candidate),
            self.score(top_candidate)
        );

        let dir = self.text_direction(top_candidate);
        let article = self.assemble_siblings(top_candidate)?;
        ArticleCleaner::new(self.doc, self.options, self.flags, self.title).prep_article(article);

        if created {
            self.doc.set_attribute(top_candidate, "id", "readability-page-1");
            self.doc.set_attribute(top_candidate, "class", "page");
        } else {
            let page_div = self.doc.create_element("div");
            self.doc.set_attribute(page_div, "id", "readability-page-1");
            self.doc.set_attribute(page_div, "class", "page");
            for child in self.doc.children(article).to_vec() {
                self.doc.append_child(page_div, child)?;
            }
            self.doc.append_child(article, page_div)?;
        }

        let text_length = char_len(&get_inner_text(self.doc, article, true));
        Ok(Some(AttemptResult {
            content: article,
            text_length,
            dir,
        }))
    }

    fn score(&self, id: NodeId) -> f64 {
        self.scores.get(&id).copied().unwrap_or(0.0)
    }

    /// Walk the document once, dropping bylines, unlikely candidates and
    /// empty blocks, normalizing `<div>`s, and collecting the elements
    /// whose text gets scored.
    fn collect_elements_to_score(&mut self) -> Vec<NodeId> {
        let mut elements = Vec::new();
        let mut node = self.doc.document_element();

        while let Some(current) = node {
            let tag = self.doc.local_name(current).to_string();
            let match_string = match_string(self.doc, current);

            if !is_probably_visible(self.doc, current) {
                debug_log!(self.options, "removing hidden node <{tag}>");
                node = remove_and_get_next(self.doc, current);
                continue;
            }

            if self.doc.get_attribute(current, "aria-modal") == Some("true")
                && self.doc.get_attribute(current, "role") == Some("dialog")
            {
                node = remove_and_get_next(self.doc, current);
                continue;
            }

            if self.check_byline(current, &match_string) {
                node = remove_and_get_next(self.doc, current);
                continue;
            }

            if self.flags.contains(ParseFlags::STRIP_UNLIKELYS) {
                if REGEXPS.unlikely_candidates.is_match(&match_string)
                    && !REGEXPS.ok_maybe_its_a_candidate.is_match(&match_string)
                    && !has_ancestor_tag(self.doc, current, "table", 3, |_| true)
                    && !has_ancestor_tag(self.doc, current, "code", 3, |_| true)
                    && tag != "body"
                    && tag != "a"
                {
                    debug_log!(self.options, "removing unlikely candidate {match_string:?}");
                    node = remove_and_get_next(self.doc, current);
                    continue;
                }

                let role = self.doc.get_attribute(current, "role").unwrap_or("");
                if UNLIKELY_ROLES.contains(&role) {
                    debug_log!(self.options, "removing content with role {role}");
                    node = remove_and_get_next(self.doc, current);
                    continue;
                }
            }

            if EMPTY_BLOCK_TAGS.contains(&tag.as_str()) && is_element_without_content(self.doc, current)
            {
                node = remove_and_get_next(self.doc, current);
                continue;
            }

            if DEFAULT_TAGS_TO_SCORE.contains(&tag.as_str()) {
                elements.push(current);
            }

            let mut current = current;
            if tag == "div" {
                self.wrap_phrasing_runs(current);

                if has_single_tag_inside_element(self.doc, current, "p")
                    && get_link_density(self.doc, current) < 0.25
                {
                    let paragraph = self.doc.element_children(current)[0];
                    if let Some(parent) = self.doc.parent(current) {
                        if self.doc.replace_child(parent, paragraph, current).is_ok() {
                            current = paragraph;
                            elements.push(paragraph);
                        }
                    }
                } else if !has_child_block_element(self.doc, current) {
                    self.doc.set_tag_name(current, "p");
                    elements.push(current);
                }
            }

            node = next_node(self.doc, current, false);
        }

        elements
    }

    /// Detect the article byline. Once found, later attempts still drop
    /// nodes repeating it so it never leaks into the content.
    fn check_byline(&mut self, id: NodeId, match_string: &str) -> bool {
        let rel_author = self.doc.get_attribute(id, "rel") == Some("author");
        let itemprop_author = self
            .doc
            .get_attribute(id, "itemprop")
            .is_some_and(|itemprop| itemprop.contains("author"));
        if !(rel_author || itemprop_author || REGEXPS.byline.is_match(match_string)) {
            return false;
        }

        let text = self.doc.text_content(id);
        let text = text.trim();
        match self.byline.as_deref() {
            Some(known) => known == text,
            None if !text.is_empty() && char_len(text) < 100 => {
                debug_log!(self.options, "found byline {text:?}");
                *self.byline = Some(text.to_string());
                true
            }
            None => false,
        }
    }

    /// Wrap runs of phrasing content directly inside `div` in `<p>`s, so
    /// loose text is scored like paragraphs.
    fn wrap_phrasing_runs(&mut self, div: NodeId) {
        let mut paragraph: Option<NodeId> = None;
        let mut child = self.doc.first_child(div);

        while let Some(current) = child {
            let next = self.doc.next_sibling(current);
            if is_phrasing_content(self.doc, current) {
                match paragraph {
                    Some(p) => {
                        let _ = self.doc.append_child(p, current);
                    }
                    None if !is_whitespace(self.doc, current) => {
                        let p = self.doc.create_element("p");
                        if self.doc.replace_child(div, p, current).is_ok() {
                            let _ = self.doc.append_child(p, current);
                            paragraph = Some(p);
                        }
                    }
                    None => {}
                }
            } else if let Some(p) = paragraph.take() {
                while let Some(last) = self.doc.last_child(p) {
                    if !is_whitespace(self.doc, last) {
                        break;
                    }
                    self.doc.remove(last);
                }
            }
            child = next;
        }
    }

    /// Score each paragraph and share the score with its ancestors.
    /// Returns the scored ancestors in the order they were first seen.
    fn score_elements(&mut self, elements: &[NodeId]) -> Vec<NodeId> {
        let mut candidates = Vec::new();

        for &element in elements {
            if !self.doc.is_attached(element)
                || !self.doc.parent(element).is_some_and(|p| self.doc.is_element(p))
            {
                continue;
            }

            let text = get_inner_text(self.doc, element, true);
            if char_len(&text) < MIN_CONTENT_TEXT_LENGTH {
                continue;
            }

            let ancestors = get_node_ancestors(self.doc, element, SCORE_ANCESTOR_DEPTH);
            if ancestors.is_empty() {
                continue;
            }

            let content_score = paragraph_score(&text);
            for (level, ancestor) in ancestors.into_iter().enumerate() {
                if !self.doc.parent(ancestor).is_some_and(|p| self.doc.is_element(p)) {
                    continue;
                }
                if !self.scores.contains_key(&ancestor) {
                    let initial = initialize_node_score(self.doc, ancestor, self.flags);
                    self.scores.insert(ancestor, initial);
                    candidates.push(ancestor);
                }
                if let Some(score) = self.scores.get_mut(&ancestor) {
                    *score += content_score / score_divider(level);
                }
            }
        }

        candidates
    }

    /// Scale candidate scores by link density and keep the best
    /// `nb_top_candidates`. A later candidate must score strictly higher to
    /// displace an earlier one.
    fn select_top_candidates(&mut self, candidates: &[NodeId]) -> Vec<NodeId> {
        let limit = self.options.nb_top_candidates.max(1);
        let mut top: Vec<NodeId> = Vec::with_capacity(limit + 1);

        for &candidate in candidates {
            let score = self.score(candidate) * (1.0 - get_link_density(self.doc, candidate));
            self.scores.insert(candidate, score);
            debug_log!(
                self.options,
                "candidate <{}> {:?} with score {score:.2}",
                self.doc.local_name(candidate),
                match_string(self.doc, candidate)
            );

            let slot = top
                .iter()
                .position(|&existing| score > self.score(existing))
                .unwrap_or(top.len());
            if slot < limit {
                top.insert(slot, candidate);
                top.truncate(limit);
            }
        }

        top
    }

    /// Move every child of the page into a new `<div>` used as the
    /// candidate.
    fn wrap_page(&mut self, page: NodeId) -> Result<NodeId, DomError> {
        let wrapper = self.doc.create_element("div");
        for child in self.doc.children(page).to_vec() {
            self.doc.append_child(wrapper, child)?;
        }
        self.doc.append_child(page, wrapper)?;
        let score = initialize_node_score(self.doc, wrapper, self.flags);
        self.scores.insert(wrapper, score);
        Ok(wrapper)
    }

    /// Walk up from the best candidate to an ancestor that holds more of
    /// the article.
    fn promote_candidate(&mut self, mut candidate: NodeId, top_candidates: &[NodeId]) -> NodeId {
        let top_score = self.score(candidate);

        // Several strong alternatives under one ancestor: that ancestor is
        // the article.
        let alternatives: Vec<Vec<NodeId>> = top_candidates[1..]
            .iter()
            .filter(|&&other| top_score > 0.0 && self.score(other) / top_score >= 0.75)
            .map(|&other| get_node_ancestors(self.doc, other, 0))
            .collect();
        if alternatives.len() >= MINIMUM_TOP_CANDIDATES {
            let mut parent = self.doc.parent(candidate);
            while let Some(ancestor) = parent.filter(|&p| self.is_below_body(p)) {
                let containing = alternatives
                    .iter()
                    .filter(|ancestors| ancestors.contains(&ancestor))
                    .count();
                if containing >= MINIMUM_TOP_CANDIDATES {
                    candidate = ancestor;
                    break;
                }
                parent = self.doc.parent(ancestor);
            }
        }
        self.ensure_scored(candidate);

        // A parent scoring higher than the candidate wins, as long as the
        // walk has not dropped below a third of the starting score.
        let mut last_score = self.score(candidate);
        let threshold = last_score / 3.0;
        let mut parent = self.doc.parent(candidate);
        while let Some(ancestor) = parent.filter(|&p| self.is_below_body(p)) {
            let Some(&parent_score) = self.scores.get(&ancestor) else {
                parent = self.doc.parent(ancestor);
                continue;
            };
            if parent_score < threshold {
                break;
            }
            if parent_score > last_score {
                candidate = ancestor;
                break;
            }
            last_score = parent_score;
            parent = self.doc.parent(ancestor);
        }

        // An only child stands for its parent.
        let mut parent = self.doc.parent(candidate);
        while let Some(ancestor) = parent.filter(|&p| self.is_below_body(p)) {
            if self.doc.element_children(ancestor).len() != 1 {
                break;
            }
            candidate = ancestor;
            parent = self.doc.parent(ancestor);
        }
        self.ensure_scored(candidate);

        candidate
    }

    fn is_below_body(&self, id: NodeId) -> bool {
        self.doc.is_element(id) && self.doc.local_name(id) != "body"
    }

    fn ensure_scored(&mut self, id: NodeId) {
        if !self.scores.contains_key(&id) {
            let score = initialize_node_score(self.doc, id, self.flags);
            self.scores.insert(id, score);
        }
    }

    /// Collect the candidate and its qualifying siblings into a new
    /// container.
    fn assemble_siblings(&mut self, top_candidate: NodeId) -> Result<NodeId, DomError> {
        let article = self.doc.create_element("div");
        let top_score = self.score(top_candidate);
        let threshold = (top_score * 0.2).max(10.0);
        let top_class = self.doc.class_name(top_candidate).to_string();

        let siblings = match self.doc.parent(top_candidate) {
            Some(parent) => self.doc.element_children(parent).to_vec(),
            None => vec![top_candidate],
        };

        for sibling in siblings {
            if !self.should_append_sibling(sibling, top_candidate, top_score, threshold, &top_class) {
                continue;
            }
            debug_log!(
                self.options,
                "appending sibling <{}> {:?}",
                self.doc.local_name(sibling),
                match_string(self.doc, sibling)
            );
            if !ALTER_TO_DIV_EXCEPTIONS.contains(&self.doc.local_name(sibling)) {
                self.doc.set_tag_name(sibling, "div");
            }
            self.doc.append_child(article, sibling)?;
        }

        Ok(article)
    }

    fn should_append_sibling(
        &self,
        sibling: NodeId,
        top_candidate: NodeId,
        top_score: f64,
        threshold: f64,
        top_class: &str,
    ) -> bool {
        if sibling == top_candidate {
            return true;
        }

        let bonus = if !top_class.is_empty() && self.doc.class_name(sibling) == top_class {
            top_score * 0.2
        } else {
            0.0
        };
        if let Some(&score) = self.scores.get(&sibling) {
            if score + bonus >= threshold {
                return true;
            }
        }

        if self.doc.local_name(sibling) != "p" {
            return false;
        }
        let link_density = get_link_density(self.doc, sibling);
        let content = get_inner_text(self.doc, sibling, true);
        let length = char_len(&content);
        (length > 80 && link_density < 0.25)
            || (length < 80
                && length > 0
                && link_density == 0.0
                && REGEXPS.sentence_end.is_match(&content))
    }

    /// The first non-empty `dir` among the candidate's parent, the
    /// candidate, and the parent's ancestors.
    fn text_direction(&self, candidate: NodeId) -> Option<String> {
        let parent = self.doc.parent(candidate);
        parent
            .into_iter()
            .chain(std::iter::once(candidate))
            .chain(parent.into_iter().flat_map(|p| get_node_ancestors(self.doc, p, 0)))
            .filter(|&id| self.doc.is_element(id))
            .find_map(|id| self.doc.get_attribute(id, "dir").filter(|dir| !dir.is_empty()))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::prep_document;

    fn options(threshold: usize) -> ReadabilityOptions {
        ReadabilityOptions::builder().char_threshold(threshold).build()
    }

    fn paragraph(n: usize) -> String {
        format!(
            "<p>Paragraph {n} carries enough prose, with commas, clauses, and detail, to be scored as real article content by the extractor.</p>"
        )
    }

    #[test]
    fn test_flag_ladder_drops_one_flag_per_step() {
        for pair in FLAG_LADDER.windows(2) {
            assert!(pair[0].contains(pair[1]));
            assert_eq!(pair[0].bits().count_ones(), pair[1].bits().count_ones() + 1);
        }
        assert_eq!(FLAG_LADDER.len(), 4);
    }

    #[test]
    fn test_picks_content_over_sidebar() {
        let body: String = (0..6).map(paragraph).collect();
        let html = format!(
            r#"<html><body><div class="sidebar"><a href="/a">Home</a> <a href="/b">About</a></div><div id="story">{body}</div></body></html>"#
        );
        let mut doc = Document::parse(&html);
        prep_document(&mut doc);

        let extracted = grab_article(&doc, "", &options(200)).unwrap().unwrap();
        let html = extracted.document.inner_html(extracted.content);
        assert!(html.starts_with(r#"<div id="readability-page-1" class="page">"#));
        assert!(html.contains("Paragraph 0"));
        assert!(html.contains("Paragraph 5"));
        assert!(!html.contains("About"));
    }

    #[test]
    fn test_original_document_untouched() {
        let body: String = (0..3).map(paragraph).collect();
        let doc = Document::parse(&format!("<html><body><div>{body}</div></body></html>"));
        let before = doc.outer_html(doc.root());
        let _ = grab_article(&doc, "", &options(100));
        assert_eq!(doc.outer_html(doc.root()), before);
    }

    #[test]
    fn test_short_page_has_no_article() {
        let doc = Document::parse("<html><body><p>Too short.</p></body></html>");
        assert!(grab_article(&doc, "", &options(500)).unwrap().is_none());
    }

    #[test]
    fn test_direction_from_ancestor() {
        let body: String = (0..4).map(paragraph).collect();
        let mut doc = Document::parse(&format!(
            r#"<html dir="rtl"><body><article><div>{body}</div></article></body></html>"#
        ));
        prep_document(&mut doc);
        let extracted = grab_article(&doc, "", &options(100)).unwrap().unwrap();
        assert_eq!(extracted.dir.as_deref(), Some("rtl"));
    }

    #[test]
    fn test_div_with_loose_text_gets_paragraphs() {
        let mut doc = Document::parse(
            "<html><body><div>Loose text that sits directly inside a div, with commas, and enough length to score.<div>Nested block</div></div></body></html>",
        );
        let options = options(10);
        let mut byline = None;
        let mut attempt = Attempt {
            doc: &mut doc,
            options: &options,
            flags: ParseFlags::all(),
            title: "",
            byline: &mut byline,
            scores: HashMap::new(),
        };
        let elements = attempt.collect_elements_to_score();
        let p = elements
            .iter()
            .copied()
            .find(|&id| doc_text_starts(&*attempt.doc, id, "Loose text"));
        assert!(p.is_some());
    }

    fn doc_text_starts(doc: &Document, id: NodeId, prefix: &str) -> bool {
        doc.local_name(id) == "p" && doc.text_content(id).starts_with(prefix)
    }
}
