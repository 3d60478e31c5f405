//! Content scores: tag priors, class weights and paragraph scores.

use crate::constants::{ParseFlags, REGEXPS};
use crate::dom::{Document, NodeId};
use crate::dom_utils::comma_count;
use crate::utils::char_len;

/// Starting score of a candidate: a prior from its tag plus its class
/// weight.
pub fn initialize_node_score(doc: &Document, id: NodeId, flags: ParseFlags) -> f64 {
    let prior = match doc.local_name(id) {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    prior + get_class_weight(doc, id, flags) as f64
}

/// ±25 for each of `class` and `id` matching the negative or positive
/// keyword patterns. Zero unless `WEIGHT_CLASSES` is active.
pub fn get_class_weight(doc: &Document, id: NodeId, flags: ParseFlags) -> i32 {
    if !flags.contains(ParseFlags::WEIGHT_CLASSES) {
        return 0;
    }

    let mut weight = 0;
    for value in [doc.class_name(id), doc.element_id(id)] {
        if value.is_empty() {
            continue;
        }
        if REGEXPS.negative.is_match(value) {
            weight -= 25;
        }
        if REGEXPS.positive.is_match(value) {
            weight += 25;
        }
    }
    weight
}

/// Score contributed by one paragraph: a point for existing, one per
/// comma-separated segment, and one per hundred characters up to three.
pub fn paragraph_score(text: &str) -> f64 {
    let segments = comma_count(text) + 1;
    let length_bonus = (char_len(text) / 100).min(3);
    1.0 + segments as f64 + length_bonus as f64
}

/// Share of a paragraph score an ancestor `level` steps above the
/// paragraph receives (0 is the parent).
pub fn score_divider(level: usize) -> f64 {
    match level {
        0 => 1.0,
        1 => 2.0,
        _ => (level * 3) as f64,
    }
}
