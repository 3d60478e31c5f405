//! The record returned by a successful extraction.
//!
//! ```rust,no_run
//! use readabilityrs::Readability;
//!
//! let html = r#"<html><body><article><h1>My Article</h1><p>Content...</p></article></body></html>"#;
//! let readability = Readability::new(html, Some("https://example.com"), None).unwrap();
//!
//! if let Ok(Some(article)) = readability.parse() {
//!     println!("Title: {:?}", article.title);
//!     println!("Length: {} characters", article.length);
//!
//!     if let Some(content) = article.content {
//!         println!("HTML: {}", content);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Extracted content and metadata of a page.
///
/// Serializes with serde, so articles can be stored as JSON:
///
/// ```rust,no_run
/// use readabilityrs::Readability;
/// # let html = "<html></html>";
/// # let readability = Readability::new(html, None, None).unwrap();
///
/// if let Ok(Some(article)) = readability.parse() {
///     let json = serde_json::to_string_pretty(&article).unwrap();
///     println!("{}", json);
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Title from JSON-LD, then `<meta>` tags, then the cleaned-up
    /// `<title>`.
    pub title: Option<String>,

    /// Article HTML, rendered by the configured serializer or as the inner
    /// HTML of the article container.
    pub content: Option<String>,

    /// Text of the article without markup.
    pub text_content: Option<String>,

    /// Length of `text_content` in characters.
    pub length: usize,

    /// Description from metadata, or the text of the first paragraph.
    pub excerpt: Option<String>,

    /// Author from metadata, or the byline found in the page.
    pub byline: Option<String>,

    /// `dir` of the article's container or its nearest ancestor having one.
    pub dir: Option<String>,

    pub site_name: Option<String>,

    /// `lang` of the `<html>` element.
    pub lang: Option<String>,

    pub published_time: Option<String>,

    /// Article HTML before URLs were made absolute and classes stripped.
    pub raw_content: Option<String>,
}

impl Article {
    pub fn new() -> Self {
        Self::default()
    }
}
