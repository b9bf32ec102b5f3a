//! Inverted index: for each word, the documents that contain it.

use std::collections::{BTreeSet, HashSet};

use map_reduce::{FnTransform, KeyValue};
use once_cell::sync::Lazy;
use regex::Regex;

static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}+").expect("Invalid regex pattern"));

/// Emits `(word, name)` once for each distinct word in the document.
pub fn map(name: &str, contents: &str) -> Vec<KeyValue> {
    let mut seen = HashSet::new();
    WORD_REGEX
        .find_iter(contents)
        .map(|word| word.as_str())
        .filter(|word| seen.insert(*word))
        .map(|word| KeyValue::new(word, name))
        .collect()
}

/// `"<count> <doc>,<doc>,..."` with documents sorted and deduplicated.
pub fn reduce(_key: &str, values: &[String]) -> String {
    let docs: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    let docs: Vec<&str> = docs.into_iter().collect();
    format!("{} {}", docs.len(), docs.join(","))
}

pub fn transform() -> FnTransform {
    FnTransform::new(map, reduce)
}
