//! Small string helpers.

use crate::constants::REGEXPS;
use std::borrow::Cow;
use url::Url;

/// Whether `text` parses as an absolute URL.
pub fn is_url(text: &str) -> bool {
    Url::parse(text.trim()).is_ok()
}

/// Number of whitespace-separated words, counting an empty string as one
/// word so that short titles compare the way headings do.
pub fn word_count(text: &str) -> usize {
    text.split(char::is_whitespace)
        .filter(|word| !word.is_empty())
        .count()
        .max(1)
}

/// Collapse runs of two or more whitespace characters into one space.
pub fn normalize_spaces(text: &str) -> Cow<'_, str> {
    REGEXPS.normalize.replace_all(text, " ")
}

/// Length in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Similarity of `b` to `a` in `[0, 1]`, based on how much of `b`'s
/// token text is also present in `a`.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let tokens_a: Vec<&str> = REGEXPS.tokenize.split(&a).filter(|t| !t.is_empty()).collect();
    let tokens_b: Vec<&str> = REGEXPS.tokenize.split(&b).filter(|t| !t.is_empty()).collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let unique_b: Vec<&str> = tokens_b
        .iter()
        .copied()
        .filter(|token| !tokens_a.contains(token))
        .collect();
    let distance = char_len(&unique_b.join(" ")) as f64 / char_len(&tokens_b.join(" ")) as f64;
    1.0 - distance
}
