use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new<K: Display, V: Display>(key: K, value: V) -> Self {
        KeyValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl<K: Display, V: Display> From<(K, V)> for KeyValue {
    fn from((key, value): (K, V)) -> Self {
        KeyValue::new(key, value)
    }
}

/// Every record the map stage produced, in input order.
///
/// Only grows while mapping; `into_sorted` freezes it for grouping.
#[derive(Debug, Default)]
pub struct IntermediateCollection {
    records: Vec<KeyValue>,
}

impl IntermediateCollection {
    pub fn new() -> Self {
        IntermediateCollection::default()
    }

    pub fn extend_from_unit(&mut self, records: Vec<KeyValue>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[KeyValue] {
        &self.records
    }

    /// Stable sort by key bytes. Equal keys keep their map-stage order.
    pub fn into_sorted(mut self) -> SortedIntermediate {
        self.records.sort_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));
        SortedIntermediate {
            records: self.records,
        }
    }
}

#[derive(Debug)]
pub struct SortedIntermediate {
    records: Vec<KeyValue>,
}

impl SortedIntermediate {
    pub fn records(&self) -> &[KeyValue] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub key: String,
    pub value: String,
}

impl OutputRecord {
    pub fn format_line(&self) -> String {
        format!("{} {}\n", self.key, self.value)
    }
}
