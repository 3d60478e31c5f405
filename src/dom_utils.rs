//! Tree helpers used by the extraction passes.

use crate::constants::{DIV_TO_P_ELEMS, PHRASING_ELEMS, REGEXPS};
use crate::dom::{Document, NodeId, NodeType};
use crate::utils::{char_len, normalize_spaces};

/// Trimmed text content, optionally with whitespace runs collapsed.
pub fn get_inner_text(doc: &Document, id: NodeId, normalize: bool) -> String {
    let text = doc.text_content(id);
    let trimmed = text.trim();
    if normalize {
        normalize_spaces(trimmed).into_owned()
    } else {
        trimmed.to_string()
    }
}

/// `class` and `id` joined by a space, the string the class/id patterns
/// are matched against.
pub fn match_string(doc: &Document, id: NodeId) -> String {
    format!("{} {}", doc.class_name(id), doc.element_id(id))
}

/// Number of commas (of any script) in the node's text.
pub fn comma_count(text: &str) -> usize {
    REGEXPS.commas.find_iter(text).count()
}

/// Fraction of the node's text that sits inside links. Fragment-only links
/// count for less.
pub fn get_link_density(doc: &Document, id: NodeId) -> f64 {
    let text_length = char_len(&get_inner_text(doc, id, true));
    if text_length == 0 {
        return 0.0;
    }

    let link_length: f64 = doc
        .get_elements_by_tag_name(id, "a")
        .into_iter()
        .map(|link| {
            let coefficient = match doc.get_attribute(link, "href") {
                Some(href) if REGEXPS.hash_url.is_match(href) => 0.3,
                _ => 1.0,
            };
            char_len(&get_inner_text(doc, link, true)) as f64 * coefficient
        })
        .sum();

    link_length / text_length as f64
}

/// Share of the node's text held by descendants named in `tags`.
pub fn get_text_density(doc: &Document, id: NodeId, tags: &[&str]) -> f64 {
    let text_length = char_len(&get_inner_text(doc, id, true));
    if text_length == 0 {
        return 0.0;
    }
    let children_length: usize = doc
        .get_elements_by_tag_names(id, tags)
        .into_iter()
        .map(|child| char_len(&get_inner_text(doc, child, true)))
        .sum();
    children_length as f64 / text_length as f64
}

/// The next element in document order. With `ignore_self_and_kids`, the
/// subtree of `id` is skipped.
pub fn next_node(doc: &Document, id: NodeId, ignore_self_and_kids: bool) -> Option<NodeId> {
    if !ignore_self_and_kids {
        if let Some(child) = doc.first_element_child(id) {
            return Some(child);
        }
    }
    let mut current = Some(id);
    while let Some(node) = current {
        if let Some(sibling) = doc.next_element_sibling(node) {
            return Some(sibling);
        }
        current = doc.parent(node);
    }
    None
}

/// Detach `id` and return the element that followed its subtree.
pub fn remove_and_get_next(doc: &mut Document, id: NodeId) -> Option<NodeId> {
    let next = next_node(doc, id, true);
    doc.remove(id);
    next
}

/// Skip whitespace-only text from `id` onwards, returning the first node
/// that is an element or carries text.
pub fn skip_whitespace_nodes(doc: &Document, mut id: Option<NodeId>) -> Option<NodeId> {
    while let Some(node) = id {
        if doc.is_element(node) || !doc.text_content(node).trim().is_empty() {
            return Some(node);
        }
        id = doc.next_sibling(node);
    }
    None
}

/// Element ancestors of `id`, nearest first. `max_depth` of zero means
/// unlimited.
pub fn get_node_ancestors(doc: &Document, id: NodeId, max_depth: usize) -> Vec<NodeId> {
    let mut ancestors = Vec::new();
    let mut current = doc.parent(id);
    while let Some(parent) = current {
        if !doc.is_element(parent) {
            break;
        }
        ancestors.push(parent);
        if max_depth > 0 && ancestors.len() == max_depth {
            break;
        }
        current = doc.parent(parent);
    }
    ancestors
}

/// Whether an ancestor within `max_depth` levels (zero means unlimited) is
/// a `tag` element accepted by `filter`.
pub fn has_ancestor_tag(
    doc: &Document,
    id: NodeId,
    tag: &str,
    max_depth: usize,
    filter: impl Fn(NodeId) -> bool,
) -> bool {
    let mut depth = 0;
    let mut current = doc.parent(id);
    while let Some(parent) = current {
        if max_depth > 0 && depth > max_depth {
            return false;
        }
        if doc.local_name(parent) == tag && filter(parent) {
            return true;
        }
        current = doc.parent(parent);
        depth += 1;
    }
    false
}

/// An element with no text whose element descendants are only line
/// breaks and rules.
pub fn is_element_without_content(doc: &Document, id: NodeId) -> bool {
    if !doc.is_element(id) || !doc.text_content(id).trim().is_empty() {
        return false;
    }
    let children = doc.element_children(id).len();
    children == 0 || children == doc.get_elements_by_tag_names(id, &["br", "hr"]).len()
}

/// Whether `id` has exactly one element child, a `tag`, and no text of its
/// own.
pub fn has_single_tag_inside_element(doc: &Document, id: NodeId, tag: &str) -> bool {
    let elements = doc.element_children(id);
    if elements.len() != 1 || doc.local_name(elements[0]) != tag {
        return false;
    }
    !doc.children(id).iter().any(|&child| {
        doc.is_text(child)
            && doc
                .text_content(child)
                .chars()
                .last()
                .is_some_and(|c| !c.is_whitespace())
    })
}

/// Whether any descendant is one of the block elements that keep a `<div>`
/// a `<div>`.
pub fn has_child_block_element(doc: &Document, id: NodeId) -> bool {
    let mut stack: Vec<NodeId> = doc.element_children(id).to_vec();
    while let Some(current) = stack.pop() {
        if DIV_TO_P_ELEMS.contains(&doc.local_name(current)) {
            return true;
        }
        stack.extend_from_slice(doc.element_children(current));
    }
    false
}

pub fn is_phrasing_content(doc: &Document, id: NodeId) -> bool {
    if doc.is_text(id) {
        return true;
    }
    let tag = doc.local_name(id);
    if PHRASING_ELEMS.contains(&tag) {
        return true;
    }
    matches!(tag, "a" | "del" | "ins")
        && doc
            .children(id)
            .iter()
            .all(|&child| is_phrasing_content(doc, child))
}

/// Whitespace-only text or a `<br>`.
pub fn is_whitespace(doc: &Document, id: NodeId) -> bool {
    match doc.node_type(id) {
        NodeType::Text => doc.text_content(id).trim().is_empty(),
        NodeType::Element => doc.local_name(id) == "br",
        _ => false,
    }
}

/// Hidden through inline style, the `hidden` attribute or `aria-hidden`.
/// Fallback images marked `aria-hidden` still count as visible.
pub fn is_probably_visible(doc: &Document, id: NodeId) -> bool {
    let style = doc.style(id);
    if style.get("display") == Some("none") || style.get("visibility") == Some("hidden") {
        return false;
    }
    if doc.has_attribute(id, "hidden") {
        return false;
    }
    doc.get_attribute(id, "aria-hidden") != Some("true")
        || doc.class_name(id).contains("fallback-image")
}

/// Remove every element after `id`, inside its subtree, that `filter`
/// accepts. `filter` receives the element and its class/id match string.
pub fn clean_matched_nodes(
    doc: &mut Document,
    id: NodeId,
    filter: impl Fn(&Document, NodeId, &str) -> bool,
) {
    let end_of_search = next_node(doc, id, true);
    let mut next = next_node(doc, id, false);
    while let Some(node) = next {
        if Some(node) == end_of_search {
            break;
        }
        if filter(doc, node, &match_string(doc, node)) {
            next = remove_and_get_next(doc, node);
        } else {
            next = next_node(doc, node, false);
        }
    }
}

/// Remove `nodes` (last first) for which `filter` holds.
pub fn remove_nodes(
    doc: &mut Document,
    nodes: Vec<NodeId>,
    mut filter: impl FnMut(&Document, NodeId) -> bool,
) {
    for node in nodes.into_iter().rev() {
        if doc.parent(node).is_some() && filter(doc, node) {
            doc.remove(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(doc: &Document, tag: &str) -> NodeId {
        doc.get_elements_by_tag_name(doc.root(), tag)[0]
    }

    #[test]
    fn test_inner_text_normalizes() {
        let doc = Document::parse("<div>  a \n\n b   c </div>");
        let div = first(&doc, "div");
        assert_eq!(get_inner_text(&doc, div, true), "a b c");
        assert_eq!(get_inner_text(&doc, div, false), "a \n\n b   c");
    }

    #[test]
    fn test_link_density_weights_hash_links() {
        let doc = Document::parse(r##"<p>0123456789<a href="/x">0123456789</a></p>"##);
        assert_eq!(get_link_density(&doc, first(&doc, "p")), 0.5);

        let doc = Document::parse(r##"<p>0123456789<a href="#x">0123456789</a></p>"##);
        let density = get_link_density(&doc, first(&doc, "p"));
        assert!((density - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_next_node_walks_document_order() {
        let doc = Document::parse("<div><p><b>x</b></p><span></span></div><em></em>");
        let div = first(&doc, "div");
        let p = first(&doc, "p");
        let b = first(&doc, "b");
        let span = first(&doc, "span");
        let em = first(&doc, "em");
        assert_eq!(next_node(&doc, div, false), Some(p));
        assert_eq!(next_node(&doc, p, false), Some(b));
        assert_eq!(next_node(&doc, b, false), Some(span));
        assert_eq!(next_node(&doc, p, true), Some(span));
        assert_eq!(next_node(&doc, span, false), Some(em));
        assert_eq!(next_node(&doc, em, false), None);
    }

    #[test]
    fn test_element_without_content() {
        let doc = Document::parse("<div><br><hr></div><section> x </section><header></header>");
        assert!(is_element_without_content(&doc, first(&doc, "div")));
        assert!(!is_element_without_content(&doc, first(&doc, "section")));
        assert!(is_element_without_content(&doc, first(&doc, "header")));
    }

    #[test]
    fn test_single_tag_inside_element() {
        let doc = Document::parse("<div> <p>a</p> </div><span>text<p>b</p></span>");
        assert!(has_single_tag_inside_element(&doc, first(&doc, "div"), "p"));
        assert!(!has_single_tag_inside_element(&doc, first(&doc, "span"), "p"));
    }

    #[test]
    fn test_phrasing_content() {
        let doc = Document::parse("<a><b>x</b></a><a><div>y</div></a><p>z</p>");
        let links = doc.get_elements_by_tag_name(doc.root(), "a");
        assert!(is_phrasing_content(&doc, links[0]));
        assert!(!is_phrasing_content(&doc, links[1]));
        assert!(!is_phrasing_content(&doc, first(&doc, "p")));
    }

    #[test]
    fn test_visibility() {
        let doc = Document::parse(
            r#"<p style="display: none">a</p><p hidden>b</p><p aria-hidden="true" class="fallback-image">c</p><p style="visibility:hidden">d</p>"#,
        );
        let ps = doc.get_elements_by_tag_name(doc.root(), "p");
        assert!(!is_probably_visible(&doc, ps[0]));
        assert!(!is_probably_visible(&doc, ps[1]));
        assert!(is_probably_visible(&doc, ps[2]));
        assert!(!is_probably_visible(&doc, ps[3]));
    }

    #[test]
    fn test_ancestor_helpers() {
        let doc = Document::parse("<table><tr><td><div><span>x</span></div></td></tr></table>");
        let span = first(&doc, "span");
        let ancestors = get_node_ancestors(&doc, span, 2);
        assert_eq!(ancestors, vec![first(&doc, "div"), first(&doc, "td")]);
        assert!(has_ancestor_tag(&doc, span, "table", 0, |_| true));
        assert!(!has_ancestor_tag(&doc, span, "table", 2, |_| true));
    }

    #[test]
    fn test_has_ancestor_tag_depth_is_inclusive() {
        let doc = Document::parse("<table><tr><td><div><span>x</span></div></td></tr></table>");
        let span = first(&doc, "span");
        // div, td and tr sit at depths 0 to 2; the table is at depth 3.
        assert!(has_ancestor_tag(&doc, span, "table", 3, |_| true));
        assert!(has_ancestor_tag(&doc, span, "div", 1, |_| true));
        assert!(!has_ancestor_tag(&doc, span, "table", 3, |_| false));
    }

    #[test]
    fn test_clean_matched_nodes_stays_in_subtree() {
        let mut doc = Document::parse(
            r#"<div id="a"><p class="share">x</p><p>keep</p></div><p class="share">outside</p>"#,
        );
        let div = first(&doc, "div");
        clean_matched_nodes(&mut doc, div, |_, _, m| m.contains("share"));
        assert_eq!(doc.text_content(div), "keep");
        assert_eq!(doc.get_elements_by_tag_name(doc.root(), "p").len(), 2);
    }
}
