//! Error types for the readability library.

use crate::dom::DomError;
use thiserror::Error;

/// Result type alias for readability operations
pub type Result<T> = std::result::Result<T, ReadabilityError>;

/// Errors that can occur during readability parsing.
///
/// A page without an article is not an error: [`Readability::parse`]
/// returns `Ok(None)` for it.
///
/// [`Readability::parse`]: crate::Readability::parse
#[derive(Error, Debug)]
pub enum ReadabilityError {
    /// Invalid URL provided
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The document has more elements than `max_elems_to_parse`
    #[error("Aborting parsing document; {0} elements found")]
    MaxElementsExceeded(usize),

    /// A tree mutation during extraction was rejected
    #[error(transparent)]
    Dom(#[from] DomError),
}
