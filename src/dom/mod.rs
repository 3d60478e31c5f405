//! Lightweight mutable DOM used by the parser and the extraction engine.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Parent, child and sibling links are plain ids, so moving,
//! replacing and removing nodes is index rewiring inside the arena. Removed
//! nodes stay allocated (detached) until the document is dropped.
//!
//! ## Example
//!
//! ```rust
//! use readabilityrs::dom::Document;
//!
//! let mut doc = Document::parse("<div id=\"main\"><p>Hello</p></div>");
//! let div = doc.get_element_by_id("main").unwrap();
//! let extra = doc.create_element("p");
//! doc.set_text_content(extra, "World");
//! doc.append_child(div, extra).unwrap();
//!
//! assert_eq!(doc.inner_html(div), "<p>Hello</p><p>World</p>");
//! ```

mod node;
mod serialize;
mod style;
mod tree;

pub use node::{Attribute, NodeId, NodeType};
pub use style::Style;
pub use tree::Document;

use thiserror::Error;

/// Errors raised by structural tree mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node passed as "child" is not a child of the given parent.
    #[error("node {0:?} is not a child of {1:?}")]
    NotAChild(NodeId, NodeId),

    /// The insertion would make a node its own ancestor, or place a
    /// document node inside another node.
    #[error("cannot insert {0:?} under {1:?}")]
    HierarchyRequest(NodeId, NodeId),

    /// The parent cannot hold children (text and comment nodes).
    #[error("node {0:?} cannot have children")]
    NotAContainer(NodeId),
}

/// Elements that never have an end tag.
///
/// `command` is obsolete but kept for documents produced by older tools.
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "wbr",
];

/// Whether `local_name` (lower-case) is a void element.
pub fn is_void_element(local_name: &str) -> bool {
    VOID_ELEMENTS.contains(&local_name)
}
