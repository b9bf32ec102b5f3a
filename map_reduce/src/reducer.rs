use tracing::{info, trace};

use crate::error::{MapReduceError, Result, Stage};
use crate::grouping::Group;
use crate::kv_store::OutputRecord;
use crate::mapper::guarded;
use crate::transform::Transform;

/// Calls `reduce` once per group, keeping the groups' key order.
/// Any failure aborts the stage; no records are returned.
pub fn run_reduce_stage<T: Transform + ?Sized>(
    transform: &T,
    groups: Vec<Group>,
) -> Result<Vec<OutputRecord>> {
    let mut output = Vec::with_capacity(groups.len());
    for group in groups {
        let value = guarded(|| transform.reduce(&group.key, &group.values))
            .map_err(|err| MapReduceError::transform(Stage::Reduce, group.key.as_str(), err))?;
        trace!(key = %group.key, values = group.values.len(), "reduced group");
        output.push(OutputRecord {
            key: group.key,
            value,
        });
    }
    info!(keys = output.len(), "reduce stage complete");
    Ok(output)
}
