//! Knobs for the extraction pipeline.
//!
//! [`ReadabilityOptions`] is a plain struct with public fields; the
//! [`ReadabilityOptionsBuilder`] is a chained alternative.
//!
//! ```rust
//! use readabilityrs::{Readability, ReadabilityOptions};
//!
//! let html = "<html><body><article><p>Content...</p></article></body></html>";
//!
//! let strict = ReadabilityOptions {
//!     char_threshold: 1000,
//!     ..Default::default()
//! };
//! let lenient = ReadabilityOptions::builder()
//!     .char_threshold(100)
//!     .keep_classes(true)
//!     .build();
//!
//! for options in [strict, lenient] {
//!     let _ = Readability::new(html, None, Some(options)).map(Readability::parse);
//! }
//! ```

use crate::constants::CLASSES_TO_PRESERVE;
use crate::dom::{Document, NodeId};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Renders the extracted article container into [`Article::content`].
///
/// Receives the document holding the article and the id of its container.
/// Without a serializer the container's inner HTML is used.
///
/// [`Article::content`]: crate::Article::content
pub type Serializer = Arc<dyn Fn(&Document, NodeId) -> String + Send + Sync>;

/// Settings for one extraction run. See the field docs for defaults.
#[derive(Clone)]
pub struct ReadabilityOptions {
    /// Emit diagnostics through the `log` crate at debug level, under the
    /// `readabilityrs` target.
    ///
    /// Default: `false`
    pub debug: bool,

    /// Refuse documents with more elements than this. `0` disables the
    /// limit.
    ///
    /// Default: `0`
    pub max_elems_to_parse: usize,

    /// Number of top candidates kept while looking for the article
    /// container.
    ///
    /// Default: `5`
    pub nb_top_candidates: usize,

    /// Minimum number of characters an article must have. Shorter results
    /// are retried with fewer heuristics, and give up after the last try.
    ///
    /// Default: `500`
    pub char_threshold: usize,

    /// Classes kept on article elements when `keep_classes` is off, in
    /// addition to `page`.
    ///
    /// Default: empty
    pub classes_to_preserve: Vec<String>,

    /// Keep every `class` attribute in the output.
    ///
    /// Default: `false`
    pub keep_classes: bool,

    /// Skip reading JSON-LD structured data.
    ///
    /// Default: `false`
    pub disable_json_ld: bool,

    /// Replaces the built-in pattern of video hosts whose embeds survive
    /// cleaning.
    ///
    /// ```rust
    /// use readabilityrs::ReadabilityOptions;
    /// use regex::Regex;
    ///
    /// let options = ReadabilityOptions {
    ///     allowed_video_regex: Regex::new(r"(?i)//media\.example\.org/").ok(),
    ///     ..Default::default()
    /// };
    /// assert!(options.allowed_video_regex.is_some());
    /// ```
    pub allowed_video_regex: Option<Regex>,

    /// Added to the link density limits used when cleaning conditionally.
    /// Positive values tolerate more links.
    ///
    /// Default: `0.0`
    pub link_density_modifier: f64,

    /// Custom rendering of the article container.
    ///
    /// Default: `None` (inner HTML)
    pub serializer: Option<Serializer>,
}

impl fmt::Debug for ReadabilityOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadabilityOptions")
            .field("debug", &self.debug)
            .field("max_elems_to_parse", &self.max_elems_to_parse)
            .field("nb_top_candidates", &self.nb_top_candidates)
            .field("char_threshold", &self.char_threshold)
            .field("classes_to_preserve", &self.classes_to_preserve)
            .field("keep_classes", &self.keep_classes)
            .field("disable_json_ld", &self.disable_json_ld)
            .field("allowed_video_regex", &self.allowed_video_regex)
            .field("link_density_modifier", &self.link_density_modifier)
            .field("serializer", &self.serializer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Default for ReadabilityOptions {
    fn default() -> Self {
        Self {
            debug: false,
            max_elems_to_parse: 0,
            nb_top_candidates: 5,
            char_threshold: 500,
            classes_to_preserve: Vec::new(),
            keep_classes: false,
            disable_json_ld: false,
            allowed_video_regex: None,
            link_density_modifier: 0.0,
            serializer: None,
        }
    }
}

impl ReadabilityOptions {
    /// Start from the defaults and override fields one by one.
    pub fn builder() -> ReadabilityOptionsBuilder {
        ReadabilityOptionsBuilder::default()
    }

    /// Classes surviving class cleanup: `page` plus the configured ones.
    pub(crate) fn preserved_classes(&self) -> impl Iterator<Item = &str> {
        CLASSES_TO_PRESERVE
            .iter()
            .copied()
            .chain(self.classes_to_preserve.iter().map(String::as_str))
    }
}

/// Builder for [`ReadabilityOptions`].
///
/// ```rust
/// use readabilityrs::ReadabilityOptions;
///
/// let options = ReadabilityOptions::builder()
///     .classes_to_preserve(vec!["caption".to_string()])
///     .serializer(|doc, id| doc.text_content(id))
///     .build();
/// ```
#[derive(Default)]
pub struct ReadabilityOptionsBuilder {
    options: ReadabilityOptions,
}

impl ReadabilityOptionsBuilder {
    pub fn debug(mut self, debug: bool) -> Self {
        self.options.debug = debug;
        self
    }

    pub fn max_elems_to_parse(mut self, max: usize) -> Self {
        self.options.max_elems_to_parse = max;
        self
    }

    pub fn nb_top_candidates(mut self, nb: usize) -> Self {
        self.options.nb_top_candidates = nb;
        self
    }

    pub fn char_threshold(mut self, threshold: usize) -> Self {
        self.options.char_threshold = threshold;
        self
    }

    pub fn classes_to_preserve(mut self, classes: Vec<String>) -> Self {
        self.options.classes_to_preserve = classes;
        self
    }

    pub fn keep_classes(mut self, keep: bool) -> Self {
        self.options.keep_classes = keep;
        self
    }

    pub fn disable_json_ld(mut self, disable: bool) -> Self {
        self.options.disable_json_ld = disable;
        self
    }

    pub fn allowed_video_regex(mut self, regex: Regex) -> Self {
        self.options.allowed_video_regex = Some(regex);
        self
    }

    pub fn link_density_modifier(mut self, modifier: f64) -> Self {
        self.options.link_density_modifier = modifier;
        self
    }

    /// Render the article container with `serializer` instead of its inner
    /// HTML.
    pub fn serializer<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&Document, NodeId) -> String + Send + Sync + 'static,
    {
        self.options.serializer = Some(Arc::new(serializer));
        self
    }

    pub fn build(self) -> ReadabilityOptions {
        self.options
    }
}
