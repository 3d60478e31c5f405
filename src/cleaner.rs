//! Document preparation before scoring, and article cleanup after
//! assembly.

use crate::constants::{
    ParseFlags, CLEAN_TAGS, DATA_TABLE_DESCENDANTS, DEPRECATED_SIZE_ATTRIBUTE_ELEMS, DIV_TO_P_ELEMS,
    EMBED_TAGS, PRESENTATIONAL_ATTRIBUTES, REGEXPS,
};
use crate::dom::{Document, NodeId};
use crate::dom_utils::{
    clean_matched_nodes, comma_count, get_inner_text, get_link_density, get_text_density,
    has_ancestor_tag, is_phrasing_content, is_whitespace, remove_nodes, skip_whitespace_nodes,
};
use crate::options::ReadabilityOptions;
use crate::scoring::get_class_weight;
use crate::utils::{char_len, text_similarity};
use regex::Regex;
use std::collections::HashSet;

/// Remove `<script>` and `<noscript>` subtrees.
pub fn remove_scripts(doc: &mut Document) {
    let scripts = doc.get_elements_by_tag_names(doc.root(), &["script", "noscript"]);
    remove_nodes(doc, scripts, |_, _| true);
}

/// Normalize the document before extraction: make sure there is a body,
/// drop styles, turn `<font>` into `<span>` and paragraphs written as
/// `<br>` chains into real `<p>` elements.
pub fn prep_document(doc: &mut Document) {
    ensure_body(doc);

    let styles = doc.get_elements_by_tag_name(doc.root(), "style");
    remove_nodes(doc, styles, |_, _| true);

    if let Some(body) = doc.body() {
        replace_brs(doc, body);
    }

    for font in doc.get_elements_by_tag_name(doc.root(), "font") {
        doc.set_tag_name(font, "span");
    }
}

/// Give documents parsed from fragments a `<body>` holding their content.
fn ensure_body(doc: &mut Document) {
    if doc.body().is_some() {
        return;
    }

    let body = doc.create_element("body");
    let root_element = doc
        .document_element()
        .filter(|&html| doc.local_name(html) == "html");
    let container = root_element.unwrap_or(doc.root());
    let children: Vec<NodeId> = doc
        .children(container)
        .iter()
        .copied()
        .filter(|&child| doc.local_name(child) != "head")
        .collect();

    for child in children {
        // `body` is a fresh element, so these moves cannot fail.
        let _ = doc.append_child(body, child);
    }
    let _ = doc.append_child(container, body);
    doc.set_body(body);
}

/// Replace two or more consecutive `<br>`s with a `<p>` holding the
/// phrasing content that follows them.
pub fn replace_brs(doc: &mut Document, id: NodeId) {
    for br in doc.get_elements_by_tag_name(id, "br") {
        let mut next = doc.next_sibling(br);
        let mut replaced = false;

        while let Some(candidate) = skip_whitespace_nodes(doc, next) {
            if doc.local_name(candidate) != "br" {
                break;
            }
            replaced = true;
            next = doc.next_sibling(candidate);
            doc.remove(candidate);
        }
        if !replaced {
            continue;
        }

        let Some(parent) = doc.parent(br) else {
            continue;
        };
        let p = doc.create_element("p");
        if doc.replace_child(parent, p, br).is_err() {
            continue;
        }

        let mut next = doc.next_sibling(p);
        while let Some(sibling) = next {
            if doc.local_name(sibling) == "br" {
                let after = skip_whitespace_nodes(doc, doc.next_sibling(sibling));
                if after.is_some_and(|n| doc.local_name(n) == "br") {
                    break;
                }
            }
            if !is_phrasing_content(doc, sibling) {
                break;
            }
            next = doc.next_sibling(sibling);
            let _ = doc.append_child(p, sibling);
        }

        while let Some(last) = doc.last_child(p) {
            if !is_whitespace(doc, last) {
                break;
            }
            doc.remove(last);
        }

        if doc.local_name(parent) == "p" {
            doc.set_tag_name(parent, "div");
        }
    }
}

/// Cleanup applied to an assembled article container.
pub struct ArticleCleaner<'a> {
    doc: &'a mut Document,
    options: &'a ReadabilityOptions,
    flags: ParseFlags,
    title: &'a str,
    data_tables: HashSet<NodeId>,
}

impl<'a> ArticleCleaner<'a> {
    pub fn new(
        doc: &'a mut Document,
        options: &'a ReadabilityOptions,
        flags: ParseFlags,
        title: &'a str,
    ) -> Self {
        Self {
            doc,
            options,
            flags,
            title,
            data_tables: HashSet::new(),
        }
    }

    fn videos(&self) -> &'a Regex {
        self.options
            .allowed_video_regex
            .as_ref()
            .unwrap_or(&REGEXPS.videos)
    }

    /// Strip presentation, boilerplate and empty elements from `article`.
    pub fn prep_article(mut self, article: NodeId) {
        self.clean_styles(article);
        self.mark_data_tables(article);

        self.clean_conditionally(article, "form");
        self.clean_conditionally(article, "fieldset");
        for tag in CLEAN_TAGS {
            self.clean(article, tag);
        }

        let threshold = self.options.char_threshold;
        for child in self.doc.element_children(article).to_vec() {
            clean_matched_nodes(self.doc, child, |doc, node, match_string| {
                REGEXPS.share_elements.is_match(match_string)
                    && char_len(&doc.text_content(node)) < threshold
            });
        }

        self.clean_title_headers(article);
        self.clean_headers(article);

        self.clean_conditionally(article, "table");
        self.clean_conditionally(article, "ul");
        self.clean_conditionally(article, "div");

        let paragraphs = self.doc.get_elements_by_tag_name(article, "p");
        remove_nodes(self.doc, paragraphs, |doc, p| {
            doc.get_elements_by_tag_names(p, &["img", "embed", "object", "iframe"])
                .is_empty()
                && get_inner_text(doc, p, false).is_empty()
        });

        let brs = self.doc.get_elements_by_tag_name(article, "br");
        remove_nodes(self.doc, brs, |doc, br| {
            skip_whitespace_nodes(doc, doc.next_sibling(br)).is_some_and(|n| doc.local_name(n) == "p")
        });
    }

    /// Drop presentational attributes below `id`. SVG subtrees and nodes
    /// marked `readability-styled` are left alone.
    fn clean_styles(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.doc.local_name(current) == "svg" {
                continue;
            }
            if self.doc.class_name(current) != "readability-styled" {
                for attribute in PRESENTATIONAL_ATTRIBUTES {
                    self.doc.remove_attribute(current, attribute);
                }
                if DEPRECATED_SIZE_ATTRIBUTE_ELEMS.contains(&self.doc.local_name(current)) {
                    self.doc.remove_attribute(current, "width");
                    self.doc.remove_attribute(current, "height");
                }
            }
            stack.extend_from_slice(self.doc.element_children(current));
        }
    }

    /// Record which tables hold data, so conditional cleaning spares them.
    fn mark_data_tables(&mut self, article: NodeId) {
        for table in self.doc.get_elements_by_tag_name(article, "table") {
            if is_data_table(self.doc, table) {
                self.data_tables.insert(table);
            }
        }
    }

    /// Remove every `tag` element, keeping embeds that point at an allowed
    /// video host.
    fn clean(&mut self, article: NodeId, tag: &str) {
        let is_embed = EMBED_TAGS.contains(&tag);
        let videos = self.videos();
        let nodes = self.doc.get_elements_by_tag_name(article, tag);
        remove_nodes(self.doc, nodes, |doc, node| {
            !(is_embed && is_allowed_video(doc, node, videos))
        });
    }

    /// A lone `<h1>` repeats the article title; a lone `<h2>` is dropped
    /// when it reads like the title.
    fn clean_title_headers(&mut self, article: NodeId) {
        let h1s = self.doc.get_elements_by_tag_name(article, "h1");
        if let [h1] = h1s[..] {
            self.doc.remove(h1);
        }

        let h2s = self.doc.get_elements_by_tag_name(article, "h2");
        if let [h2] = h2s[..] {
            let heading = get_inner_text(self.doc, h2, false);
            if text_similarity(self.title, &heading) > 0.75 {
                self.doc.remove(h2);
            }
        }
    }

    /// Drop `<h1>`/`<h2>` with a negative class weight or mostly link text.
    fn clean_headers(&mut self, article: NodeId) {
        let flags = self.flags;
        let headers = self.doc.get_elements_by_tag_names(article, &["h1", "h2"]);
        remove_nodes(self.doc, headers, |doc, header| {
            get_class_weight(doc, header, flags) < 0 || get_link_density(doc, header) > 0.33
        });
    }

    /// Remove `tag` elements that look like boilerplate: negative weight,
    /// more images or list items than paragraphs, many inputs, little
    /// text, dense links or stray embeds.
    fn clean_conditionally(&mut self, article: NodeId, tag: &str) {
        if !self.flags.contains(ParseFlags::CLEAN_CONDITIONALLY) {
            return;
        }

        let nodes = self.doc.get_elements_by_tag_name(article, tag);
        for node in nodes.into_iter().rev() {
            if self.doc.parent(node).is_none() {
                continue;
            }
            if self.should_remove(node, tag) {
                debug_log!(
                    self.options,
                    "cleaning conditionally <{tag} class={:?} id={:?}>",
                    self.doc.class_name(node),
                    self.doc.element_id(node)
                );
                self.doc.remove(node);
            }
        }
    }

    fn should_remove(&self, node: NodeId, tag: &str) -> bool {
        let doc = &*self.doc;
        let is_data_table = |id: NodeId| self.data_tables.contains(&id);

        if tag == "table" && is_data_table(node) {
            return false;
        }
        if has_ancestor_tag(doc, node, "table", 0, is_data_table)
            || has_ancestor_tag(doc, node, "code", 3, |_| true)
        {
            return false;
        }
        if doc
            .get_elements_by_tag_name(node, "table")
            .into_iter()
            .any(is_data_table)
        {
            return false;
        }

        let weight = get_class_weight(doc, node, self.flags);
        if weight < 0 {
            return true;
        }

        let inner_text = get_inner_text(doc, node, true);
        if comma_count(&inner_text) >= 10 {
            return false;
        }

        let content_length = char_len(&inner_text);
        let is_list = matches!(tag, "ul" | "ol") || {
            let list_length: usize = doc
                .get_elements_by_tag_names(node, &["ul", "ol"])
                .into_iter()
                .map(|list| char_len(&get_inner_text(doc, list, true)))
                .sum();
            content_length > 0 && list_length as f64 / content_length as f64 > 0.9
        };

        let count = |name: &str| doc.get_elements_by_tag_name(node, name).len();
        let p = count("p");
        let img = count("img");
        let li = count("li") as i64 - 100;
        let input = count("input");

        let mut embed_count = 0;
        let videos = self.videos();
        for embed in doc.get_elements_by_tag_names(node, EMBED_TAGS) {
            if is_allowed_video(doc, embed, videos) {
                return false;
            }
            embed_count += 1;
        }

        if REGEXPS.ad_words.is_match(&inner_text) || REGEXPS.loading_words.is_match(&inner_text) {
            return true;
        }

        let link_density = get_link_density(doc, node);
        let modifier = self.options.link_density_modifier;
        let heading_density = get_text_density(doc, node, &["h1", "h2", "h3", "h4", "h5", "h6"]);
        let mut textish_tags = vec!["span", "li", "td"];
        textish_tags.extend_from_slice(DIV_TO_P_ELEMS);
        let text_density = get_text_density(doc, node, &textish_tags);
        let is_figure_child = has_ancestor_tag(doc, node, "figure", 3, |_| true);

        let remove = (!is_figure_child && img > 1 && (p as f64 / img as f64) < 0.5)
            || (!is_list && li > p as i64)
            || input > p / 3
            || (!is_list
                && !is_figure_child
                && heading_density < 0.9
                && content_length < 25
                && (img == 0 || img > 2)
                && link_density > 0.0)
            || (!is_list && weight < 25 && link_density > 0.2 + modifier)
            || (weight >= 25 && link_density > 0.5 + modifier)
            || ((embed_count == 1 && content_length < 75) || embed_count > 1)
            || (img == 0 && text_density == 0.0);

        if is_list && remove {
            // A list of single-image items is a gallery.
            let nested = doc
                .element_children(node)
                .iter()
                .any(|&child| doc.element_children(child).len() > 1);
            if !nested && img == count("li") {
                return false;
            }
        }
        remove
    }
}

/// Whether `table` holds tabular data rather than page layout.
pub fn is_data_table(doc: &Document, table: NodeId) -> bool {
    if doc.get_attribute(table, "role") == Some("presentation") {
        return false;
    }
    if doc.get_attribute(table, "datatable") == Some("0") {
        return false;
    }
    if doc.has_attribute(table, "summary") {
        return true;
    }
    if let Some(&caption) = doc.get_elements_by_tag_name(table, "caption").first() {
        if !doc.children(caption).is_empty() {
            return true;
        }
    }
    if !doc
        .get_elements_by_tag_names(table, DATA_TABLE_DESCENDANTS)
        .is_empty()
    {
        return true;
    }
    if !doc.get_elements_by_tag_name(table, "table").is_empty() {
        return false;
    }

    let (rows, columns) = row_and_column_count(doc, table);
    if rows == 1 || columns == 1 {
        return false;
    }
    if rows >= 10 || columns > 4 {
        return true;
    }
    rows * columns > 10
}

fn row_and_column_count(doc: &Document, table: NodeId) -> (usize, usize) {
    let span = |id: NodeId, name: &str| -> usize {
        doc.get_attribute(id, name)
            .and_then(|value| value.trim().parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(1)
    };

    let mut rows = 0;
    let mut columns = 0;
    for tr in doc.get_elements_by_tag_name(table, "tr") {
        rows += span(tr, "rowspan");
        let row_columns: usize = doc
            .get_elements_by_tag_name(tr, "td")
            .into_iter()
            .map(|cell| span(cell, "colspan"))
            .sum();
        columns = columns.max(row_columns);
    }
    (rows, columns)
}

/// Embeds whose attributes (or, for `<object>`, markup) reference an
/// allowed video host.
fn is_allowed_video(doc: &Document, embed: NodeId, videos: &Regex) -> bool {
    doc.attributes(embed)
        .iter()
        .any(|attribute| videos.is_match(attribute.value()))
        || (doc.local_name(embed) == "object" && videos.is_match(&doc.inner_html(embed)))
}
