//! Final touches on the extracted article: absolute URLs, inert
//! `javascript:` links and class cleanup.

use crate::constants::{MEDIA_TAGS, REGEXPS};
use crate::dom::{Document, NodeId};
use crate::options::ReadabilityOptions;
use url::Url;

pub fn post_process_content(doc: &mut Document, article: NodeId, options: &ReadabilityOptions) {
    fix_relative_uris(doc, article);
    if !options.keep_classes {
        clean_classes(doc, article, options);
    }
}

/// Resolves URLs against the document's base URI.
struct UriResolver {
    base: Option<Url>,
    keep_fragments: bool,
}

impl UriResolver {
    fn new(doc: &Document) -> Self {
        let base_uri = doc.base_uri();
        Self {
            base: base_uri.and_then(|base| Url::parse(base).ok()),
            keep_fragments: base_uri.is_some() && base_uri == doc.document_uri(),
        }
    }

    /// `uri` made absolute, or returned as is when it cannot be resolved.
    fn resolve(&self, uri: &str) -> String {
        if self.keep_fragments && uri.starts_with('#') {
            return uri.to_string();
        }
        self.base
            .as_ref()
            .and_then(|base| base.join(uri).ok())
            .map(String::from)
            .unwrap_or_else(|| uri.to_string())
    }

    fn resolve_srcset(&self, srcset: &str) -> String {
        REGEXPS
            .srcset_url
            .replace_all(srcset, |caps: &regex::Captures| {
                format!(
                    "{}{}{}",
                    self.resolve(&caps[1]),
                    caps.get(2).map_or("", |m| m.as_str()),
                    &caps[3]
                )
            })
            .into_owned()
    }
}

fn fix_relative_uris(doc: &mut Document, article: NodeId) {
    let resolver = UriResolver::new(doc);

    for link in doc.get_elements_by_tag_name(article, "a") {
        let Some(href) = doc.get_attribute(link, "href").map(str::to_string) else {
            continue;
        };
        if href.is_empty() {
            continue;
        }
        if href.starts_with("javascript:") {
            replace_script_link(doc, link);
        } else {
            doc.set_attribute(link, "href", &resolver.resolve(&href));
        }
    }

    for media in doc.get_elements_by_tag_names(article, MEDIA_TAGS) {
        for name in ["src", "poster"] {
            if let Some(value) = doc.get_attribute(media, name).filter(|v| !v.is_empty()) {
                let resolved = resolver.resolve(value);
                doc.set_attribute(media, name, &resolved);
            }
        }
        if let Some(srcset) = doc.get_attribute(media, "srcset").filter(|v| !v.is_empty()) {
            let resolved = resolver.resolve_srcset(srcset);
            doc.set_attribute(media, "srcset", &resolved);
        }
    }
}

/// Swap a `javascript:` link for its text, or for a `<span>` when it holds
/// more than a single text node.
fn replace_script_link(doc: &mut Document, link: NodeId) {
    let Some(parent) = doc.parent(link) else {
        return;
    };
    let children = doc.children(link).to_vec();
    let replacement = if children.len() == 1 && doc.is_text(children[0]) {
        let text = doc.text_content(link);
        doc.create_text_node(&text)
    } else {
        let span = doc.create_element("span");
        for child in children {
            let _ = doc.append_child(span, child);
        }
        span
    };
    let _ = doc.replace_child(parent, replacement, link);
}

/// Drop every class not in the preserved set, removing `class` entirely
/// when nothing is left.
fn clean_classes(doc: &mut Document, article: NodeId, options: &ReadabilityOptions) {
    let mut elements = vec![article];
    elements.extend(doc.get_elements_by_tag_name(article, "*"));

    for element in elements {
        if !doc.has_attribute(element, "class") {
            continue;
        }
        let kept = doc
            .class_name(element)
            .split_whitespace()
            .filter(|class| options.preserved_classes().any(|keep| keep == *class))
            .collect::<Vec<_>>()
            .join(" ");
        if kept.is_empty() {
            doc.remove_attribute(element, "class");
        } else {
            doc.set_attribute(element, "class", &kept);
        }
    }
}
