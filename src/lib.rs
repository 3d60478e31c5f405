//! # ReadabilityRS
//!
//! Extracts the main article of a web page, the way Firefox Reader View
//! does, together with its metadata.
//!
//! The crate carries its own permissive HTML parser and a small mutable
//! DOM ([`dom::Document`]), so it has no dependency on a browser engine.
//! Malformed markup never fails to parse; the parser records diagnostics
//! and keeps going.
//!
//! ## Key Features
//!
//! - **Content Extraction**: scores blocks of text and keeps the container holding the article
//! - **Metadata Extraction**: title, byline, excerpt, site name, language and publish date
//! - **JSON-LD Support**: reads schema.org article data
//! - **Retries**: relaxes its heuristics step by step on hard pages
//! - **Pre-flight Check**: [`is_probably_readerable`] decides cheaply whether to bother
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use readabilityrs::{Readability, ReadabilityOptions};
//!
//! let html = r#"<html><body><article><h1>Title</h1><p>Content...</p></article></body></html>"#;
//! let url = "https://example.com/article";
//!
//! let options = ReadabilityOptions::default();
//! let readability = Readability::new(html, Some(url), Some(options)).unwrap();
//!
//! if let Ok(Some(article)) = readability.parse() {
//!     println!("Title: {:?}", article.title);
//!     println!("Content: {:?}", article.content);
//!     println!("Author: {:?}", article.byline);
//! }
//! ```
//!
//! ### Pre-flight Check
//!
//! ```rust,no_run
//! use readabilityrs::is_probably_readerable;
//!
//! let html = "<html>...</html>";
//!
//! if is_probably_readerable(html, None) {
//!     // Proceed with full parsing
//! }
//! ```
//!
//! ## Error Handling
//!
//! A page without an article is `Ok(None)`. Errors are reserved for bad
//! input: an invalid URL or a document over the element limit.
//!
//! ```rust,no_run
//! use readabilityrs::{Readability, ReadabilityError};
//!
//! let html = "<html>...</html>";
//!
//! match Readability::new(html, Some("not a valid url"), None) {
//!     Ok(readability) => {
//!         if let Ok(Some(_article)) = readability.parse() {
//!             println!("Success!");
//!         }
//!     }
//!     Err(ReadabilityError::InvalidUrl(url)) => eprintln!("Invalid URL: {}", url),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! ## Logging
//!
//! With [`ReadabilityOptions::debug`] set, extraction decisions are logged
//! through the [`log`] facade at debug level under the `readabilityrs`
//! target. Parser diagnostics go to `readabilityrs::parser` at warn level.
//! Install any `log` backend to see them.
//!
//! ## Algorithm
//!
//! Scripts and styles are removed and the page is normalized. Blocks of
//! text are scored by length and punctuation, and the scores flow up to
//! their ancestors. The best ancestor, adjusted for link density, becomes
//! the article, together with siblings that look like part of it. The
//! result is cleaned of boilerplate, and if it is too short the whole
//! process is repeated with fewer heuristics.

/// `log::debug!` on the `readabilityrs` target, only when the options have
/// `debug` set.
macro_rules! debug_log {
    ($options:expr, $($arg:tt)+) => {
        if $options.debug {
            log::debug!(target: "readabilityrs", $($arg)+);
        }
    };
}

mod article;
mod cleaner;
mod constants;
mod content_extractor;
pub mod dom;
mod dom_utils;
pub mod entities;
mod error;
mod metadata;
mod options;
mod parser;
mod post_processor;
mod readability;
mod readerable;
mod scoring;
mod utils;

// Public exports
pub use article::Article;
pub use dom::{Document, DomError, NodeId, NodeType};
pub use error::{ReadabilityError, Result};
pub use options::{ReadabilityOptions, ReadabilityOptionsBuilder, Serializer};
pub use parser::HtmlParser;
pub use readability::Readability;
pub use readerable::{is_probably_readerable, is_probably_readerable_document, ReaderableOptions};
