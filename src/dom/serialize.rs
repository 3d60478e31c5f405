//! Markup serialization for `inner_html` / `outer_html`.

use super::node::{Attribute, NodeKind};
use super::{is_void_element, Document, NodeId};

enum Step {
    Enter(NodeId),
    Leave(NodeId),
}

pub(super) fn inner_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(id) {
        write_node(doc, child, &mut out);
    }
    out
}

pub(super) fn outer_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let mut stack = vec![Step::Enter(id)];

    while let Some(step) = stack.pop() {
        let current = match step {
            Step::Enter(current) => current,
            Step::Leave(current) => {
                out.push_str("</");
                out.push_str(doc.local_name(current));
                out.push('>');
                continue;
            }
        };

        let node = doc.node(current);
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text.html()),
            NodeKind::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
            NodeKind::Document | NodeKind::DocumentFragment => {
                stack.extend(node.children.iter().rev().map(|&c| Step::Enter(c)));
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.local_name);
                for attr in &el.attributes {
                    write_attribute(attr, out);
                }

                if node.children.is_empty() && el.self_closing {
                    out.push_str("/>");
                } else if node.children.is_empty() && is_void_element(&el.local_name) {
                    out.push('>');
                } else {
                    out.push('>');
                    stack.push(Step::Leave(current));
                    stack.extend(node.children.iter().rev().map(|&c| Step::Enter(c)));
                }
            }
        }
    }
}

/// Values are written as stored (encoded). Double quotes are preferred;
/// single quotes are used when the value itself holds a double quote.
fn write_attribute(attr: &Attribute, out: &mut String) {
    let raw = attr.raw_value();
    out.push(' ');
    out.push_str(attr.name());
    out.push('=');

    match (raw.contains('"'), raw.contains('\'')) {
        (false, _) => {
            out.push('"');
            out.push_str(raw);
            out.push('"');
        }
        (true, false) => {
            out.push('\'');
            out.push_str(raw);
            out.push('\'');
        }
        (true, true) => {
            out.push('"');
            out.push_str(&raw.replace('"', "&quot;"));
            out.push('"');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Document;

    #[test]
    fn test_attribute_quoting() {
        let doc = Document::parse(r#"<p title='say "hi"' lang="it's"></p>"#);
        let p = doc.get_elements_by_tag_name(doc.root(), "p")[0];
        assert_eq!(doc.outer_html(p), r#"<p title='say "hi"' lang="it's"></p>"#);
    }

    #[test]
    fn test_set_attribute_encodes_quotes() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        doc.set_attribute(a, "title", "say \"hi\"");
        assert_eq!(doc.outer_html(a), r#"<a title="say &quot;hi&quot;"></a>"#);
        assert_eq!(doc.get_attribute(a, "title"), Some("say \"hi\""));
    }

    #[test]
    fn test_void_and_self_closing_elements() {
        let doc = Document::parse(r#"<div><br><img src="x"/><input><span/></div>"#);
        let div = doc.get_elements_by_tag_name(doc.root(), "div")[0];
        assert_eq!(doc.inner_html(div), r#"<br><img src="x"/><input><span/>"#);
    }

    #[test]
    fn test_comment_and_text_serialization() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let comment = doc.create_comment(" note ");
        let text = doc.create_text_node("1 < 2 & \"ok\"");
        doc.append_child(div, comment).unwrap();
        doc.append_child(div, text).unwrap();
        assert_eq!(doc.inner_html(div), "<!-- note -->1 &lt; 2 &amp; \"ok\"");
    }
}
