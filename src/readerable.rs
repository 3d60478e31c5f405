//! Quick readability check without full extraction.
//!
//! [`is_probably_readerable`] parses the page and looks for enough long,
//! visible paragraphs to make extraction worthwhile, without scoring or
//! mutating anything.
//!
//! ```rust
//! use readabilityrs::{is_probably_readerable, Readability};
//!
//! let html = "<html>...</html>";
//!
//! if is_probably_readerable(html, None) {
//!     let readability = Readability::new(html, None, None).unwrap();
//!     if let Ok(Some(article)) = readability.parse() {
//!         println!("Article extracted: {:?}", article.title);
//!     }
//! } else {
//!     println!("Not an article page, skipping parse");
//! }
//! ```

use crate::constants::REGEXPS;
use crate::dom::{Document, NodeId};
use crate::dom_utils::{has_ancestor_tag, is_probably_visible, match_string};
use crate::utils::char_len;

/// Options for the readability pre-flight check.
///
/// ```rust
/// use readabilityrs::{is_probably_readerable, ReaderableOptions};
///
/// let options = ReaderableOptions {
///     min_content_length: 200,
///     min_score: 30.0,
///     ..ReaderableOptions::default()
/// };
///
/// assert!(!is_probably_readerable("<p>Short</p>", Some(options)));
/// ```
#[derive(Debug, Clone)]
pub struct ReaderableOptions {
    /// Blocks with less trimmed text than this are ignored.
    ///
    /// Default: `140`
    pub min_content_length: usize,

    /// Score the counted blocks must exceed.
    ///
    /// Default: `20.0`
    pub min_score: f64,

    /// Skip blocks hidden through `style`, `hidden` or `aria-hidden`.
    ///
    /// Default: `true`
    pub visibility_check: bool,
}

impl Default for ReaderableOptions {
    fn default() -> Self {
        Self {
            min_content_length: 140,
            min_score: 20.0,
            visibility_check: true,
        }
    }
}

/// Whether `html` probably holds an article.
///
/// Each visible `<p>`, `<pre>` or `<article>` (and each `<div>` holding a
/// `<br>`) with at least `min_content_length` characters adds the square
/// root of its excess length to a score. The page is readerable once the
/// score passes `min_score`. Paragraphs inside list items and blocks whose
/// class or id look like boilerplate are not counted.
///
/// ```rust
/// use readabilityrs::is_probably_readerable;
///
/// let paragraph = format!("<p>{}</p>", "Long enough sentence for the check. ".repeat(20));
/// let html = format!("<html><body>{}</body></html>", paragraph.repeat(3));
/// assert!(is_probably_readerable(&html, None));
///
/// assert!(!is_probably_readerable("<html><body><p>Short</p></body></html>", None));
/// ```
pub fn is_probably_readerable(html: &str, options: Option<ReaderableOptions>) -> bool {
    is_probably_readerable_document(&Document::parse(html), options)
}

/// [`is_probably_readerable`] on an already parsed document.
pub fn is_probably_readerable_document(
    document: &Document,
    options: Option<ReaderableOptions>,
) -> bool {
    let options = options.unwrap_or_default();
    let mut score = 0.0;

    candidate_blocks(document).into_iter().any(|node| {
        if options.visibility_check && !is_probably_visible(document, node) {
            return false;
        }

        let match_string = match_string(document, node);
        if REGEXPS.unlikely_candidates.is_match(&match_string)
            && !REGEXPS.ok_maybe_its_a_candidate.is_match(&match_string)
        {
            return false;
        }

        if document.local_name(node) == "p" && has_ancestor_tag(document, node, "li", 0, |_| true)
        {
            return false;
        }

        let length = char_len(document.text_content(node).trim());
        if length < options.min_content_length {
            return false;
        }

        score += ((length - options.min_content_length) as f64).sqrt();
        score > options.min_score
    })
}

/// `p`, `pre` and `article` elements in document order, followed by the
/// `div`s that directly contain a `<br>`.
fn candidate_blocks(document: &Document) -> Vec<NodeId> {
    let root = document.root();
    let mut nodes = document.get_elements_by_tag_names(root, &["p", "pre", "article"]);

    for br in document.get_elements_by_tag_name(root, "br") {
        let Some(parent) = document.parent(br) else {
            continue;
        };
        if document.local_name(parent) == "div" && !nodes.contains(&parent) {
            nodes.push(parent);
        }
    }

    nodes
}
