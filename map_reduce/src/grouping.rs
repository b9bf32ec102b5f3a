use tracing::info;

use crate::kv_store::{IntermediateCollection, KeyValue};

/// One distinct key and every value emitted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub values: Vec<String>,
}

/// Sorts the collection by key and splits it into maximal runs of equal keys.
/// Groups come out in ascending byte order of key.
pub fn group_by_key(intermediate: IntermediateCollection) -> Vec<Group> {
    let sorted = intermediate.into_sorted();
    let records = sorted.records();

    let mut groups = Vec::new();
    let mut i = 0;
    while i < records.len() {
        let key = &records[i].key;
        let run = records[i..]
            .iter()
            .take_while(|kv| kv.key == *key)
            .count();
        groups.push(Group {
            key: key.clone(),
            values: records[i..i + run]
                .iter()
                .map(|kv: &KeyValue| kv.value.clone())
                .collect(),
        });
        i += run;
    }

    info!(
        records = sorted.len(),
        groups = groups.len(),
        "grouping stage complete"
    );
    groups
}
