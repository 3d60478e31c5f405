//! Node storage types for the arena.

use crate::entities::{decode_html, encode_html, encode_text_content};
use once_cell::unsync::OnceCell;

/// Handle to a node inside a [`Document`](super::Document).
///
/// Ids are only meaningful for the document that created them. A cloned
/// document keeps the same ids for the same nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
    DocumentFragment,
}

/// A name/value attribute pair.
///
/// The value is stored HTML-encoded, exactly as it appeared in the markup or
/// as encoded by `set_attribute`. The decoded form is computed on first read.
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    value: String,
    decoded: OnceCell<String>,
}

impl Attribute {
    /// Create an attribute from an already-encoded value.
    pub fn new(name: impl Into<String>, encoded_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: encoded_value.into(),
            decoded: OnceCell::new(),
        }
    }

    /// Create an attribute from a plain (decoded) value.
    pub fn from_decoded(name: impl Into<String>, value: &str) -> Self {
        let attr = Self::new(name, encode_html(value).into_owned());
        let _ = attr.decoded.set(value.to_string());
        attr
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value as stored, still HTML-encoded.
    pub fn raw_value(&self) -> &str {
        &self.value
    }

    /// The decoded value.
    pub fn value(&self) -> &str {
        self.decoded
            .get_or_init(|| decode_html(&self.value).into_owned())
    }

    pub(crate) fn set_raw_value(&mut self, encoded_value: String) {
        self.value = encoded_value;
        self.decoded = OnceCell::new();
    }

    pub(crate) fn set_value(&mut self, value: &str) {
        self.value = encode_html(value).into_owned();
        self.decoded = OnceCell::from(value.to_string());
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) tag_name: String,
    pub(crate) local_name: String,
    pub(crate) attributes: Vec<Attribute>,
    /// Set by the parser when the tag was written as `<tag/>`.
    pub(crate) self_closing: bool,
}

impl ElementData {
    /// `tag` may carry a namespace prefix (`svg:rect`); only the part after
    /// the last colon is kept.
    pub(crate) fn new(tag: &str) -> Self {
        let local = tag.rsplit(':').next().unwrap_or(tag);
        Self {
            tag_name: local.to_ascii_uppercase(),
            local_name: local.to_ascii_lowercase(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    pub(crate) fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Set from an already-encoded value. An existing attribute with the
    /// same name is overwritten in place, keeping its position.
    pub(crate) fn set_raw_attribute(&mut self, name: &str, encoded_value: String) {
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.set_raw_value(encoded_value),
            None => self.attributes.push(Attribute::new(name, encoded_value)),
        }
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.set_value(value),
            None => self.attributes.push(Attribute::from_decoded(name, value)),
        }
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|attr| attr.name != name);
        self.attributes.len() != before
    }
}

#[derive(Debug, Clone)]
enum TextRepr {
    Html(String),
    Plain(String),
}

/// Text content stored in exactly one form, with the other form derived on
/// demand and dropped whenever the stored form changes.
#[derive(Debug, Clone)]
pub(crate) struct TextData {
    repr: TextRepr,
    derived: OnceCell<String>,
}

impl TextData {
    pub(crate) fn from_html(html: String) -> Self {
        Self {
            repr: TextRepr::Html(html),
            derived: OnceCell::new(),
        }
    }

    pub(crate) fn from_text(text: String) -> Self {
        Self {
            repr: TextRepr::Plain(text),
            derived: OnceCell::new(),
        }
    }

    /// Encoded (`innerHTML`-style) form.
    pub(crate) fn html(&self) -> &str {
        match &self.repr {
            TextRepr::Html(html) => html,
            TextRepr::Plain(text) => self
                .derived
                .get_or_init(|| encode_text_content(text).into_owned()),
        }
    }

    /// Decoded (`textContent`-style) form.
    pub(crate) fn text(&self) -> &str {
        match &self.repr {
            TextRepr::Plain(text) => text,
            TextRepr::Html(html) => self
                .derived
                .get_or_init(|| decode_html(html).into_owned()),
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.repr = TextRepr::Plain(text);
        self.derived = OnceCell::new();
    }

    pub(crate) fn set_html(&mut self, html: String) {
        self.repr = TextRepr::Html(html);
        self.derived = OnceCell::new();
    }

    /// Append raw markup text, switching to the encoded representation.
    pub(crate) fn push_html(&mut self, html: &str) {
        let mut current = self.html().to_string();
        current.push_str(html);
        self.set_html(current);
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document,
    Element(ElementData),
    Text(TextData),
    Comment(String),
    DocumentFragment,
}

impl NodeKind {
    pub(crate) fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Comment(_) => NodeType::Comment,
            NodeKind::DocumentFragment => NodeType::DocumentFragment,
        }
    }

    pub(crate) fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Document | NodeKind::Element(_) | NodeKind::DocumentFragment
        )
    }
}

/// One arena slot. Sibling and element-child fields are caches derived
/// from the parent's `children` list.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) element_children: Vec<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) prev_element_sibling: Option<NodeId>,
    pub(crate) next_element_sibling: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            element_children: Vec::new(),
            prev_sibling: None,
            next_sibling: None,
            prev_element_sibling: None,
            next_element_sibling: None,
        }
    }

    pub(crate) fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub(crate) fn clear_links(&mut self) {
        self.parent = None;
        self.prev_sibling = None;
        self.next_sibling = None;
        self.prev_element_sibling = None;
        self.next_element_sibling = None;
    }
}
