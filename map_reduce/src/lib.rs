//! Sequential map/reduce: map every input, group the intermediate records
//! by key, reduce each group, write one `"<key> <value>"` line per key.

mod config;
mod driver;
mod error;
mod grouping;
mod input;
mod kv_store;
mod mapper;
mod output;
mod reducer;
mod transform;

pub use config::{Config, DEFAULT_OUTPUT};
pub use driver::{Driver, RunState, RunSummary};
pub use error::{MapReduceError, Result, Stage, TransformError};
pub use grouping::{group_by_key, Group};
pub use input::{read_inputs, InputUnit};
pub use kv_store::{IntermediateCollection, KeyValue, OutputRecord, SortedIntermediate};
pub use mapper::run_map_stage;
pub use output::write_output;
pub use reducer::run_reduce_stage;
pub use transform::{FnTransform, MapFn, ReduceFn, Transform, TransformRegistry};

pub fn init<T: Transform>(transform: T, config: Config) -> Driver<T> {
    Driver::new(transform, config)
}
