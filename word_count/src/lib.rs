//! Word count: how many times each word appears across all inputs.

use map_reduce::{FnTransform, KeyValue};
use once_cell::sync::Lazy;
use regex::Regex;

// Letters only (general category L); marks and letter numbers split words.
static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}+").expect("Invalid regex pattern"));

/// Emits `(word, "1")` for every maximal run of letters in `contents`.
pub fn map(_name: &str, contents: &str) -> Vec<KeyValue> {
    WORD_REGEX
        .find_iter(contents)
        .map(|word| KeyValue::new(word.as_str(), 1))
        .collect()
}

/// Number of occurrences of `key`.
pub fn reduce(_key: &str, values: &[String]) -> String {
    values.len().to_string()
}

pub fn transform() -> FnTransform {
    FnTransform::new(map, reduce)
}
