use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info};

use crate::error::{MapReduceError, Result, Stage, TransformError};
use crate::input::InputUnit;
use crate::kv_store::IntermediateCollection;
use crate::transform::Transform;

/// Calls `map` on every unit in order and concatenates the results.
/// The first failing unit aborts the stage and its partial output is dropped.
pub fn run_map_stage<T: Transform + ?Sized>(
    transform: &T,
    units: &[InputUnit],
) -> Result<IntermediateCollection> {
    let mut intermediate = IntermediateCollection::new();
    for unit in units {
        let records = guarded(|| transform.map(&unit.name, &unit.contents))
            .map_err(|err| MapReduceError::transform(Stage::Map, unit.name.as_str(), err))?;
        debug!(input = %unit.name, records = records.len(), "mapped input");
        intermediate.extend_from_unit(records);
    }
    info!(
        inputs = units.len(),
        records = intermediate.len(),
        "map stage complete"
    );
    Ok(intermediate)
}

/// Runs a transform callable, turning a panic into a `TransformError`.
pub(crate) fn guarded<R>(
    f: impl FnOnce() -> std::result::Result<R, TransformError>,
) -> std::result::Result<R, TransformError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            Err(TransformError::new(format!("panicked: {message}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv_store::KeyValue;
    use crate::transform::FnTransform;

    fn words(_name: &str, contents: &str) -> Vec<KeyValue> {
        contents
            .split_whitespace()
            .map(|w| KeyValue::new(w, 1))
            .collect()
    }

    fn count(_key: &str, values: &[String]) -> String {
        values.len().to_string()
    }

    struct FailsOn(&'static str);

    impl Transform for FailsOn {
        fn map(&self, name: &str, contents: &str) -> std::result::Result<Vec<KeyValue>, TransformError> {
            if name == self.0 {
                return Err(TransformError::new("unreadable record"));
            }
            Ok(words(name, contents))
        }

        fn reduce(&self, key: &str, values: &[String]) -> std::result::Result<String, TransformError> {
            Ok(count(key, values))
        }
    }

    #[test]
    fn concatenates_in_input_order() {
        let units = vec![InputUnit::new("a", "x y"), InputUnit::new("b", "z x")];
        let intermediate = run_map_stage(&FnTransform::new(words, count), &units).unwrap();
        let keys: Vec<&str> = intermediate.records().iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, vec!["x", "y", "z", "x"]);
    }

    #[test]
    fn no_inputs_gives_empty_collection() {
        let intermediate = run_map_stage(&FnTransform::new(words, count), &[]).unwrap();
        assert!(intermediate.is_empty());
    }

    #[test]
    fn map_error_names_the_input() {
        let units = vec![InputUnit::new("ok.txt", "a"), InputUnit::new("bad.txt", "b")];
        let err = run_map_stage(&FailsOn("bad.txt"), &units).unwrap_err();
        match err {
            MapReduceError::Transform { stage, unit, .. } => {
                assert_eq!(stage, Stage::Map);
                assert_eq!(unit, "bad.txt");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn panic_becomes_transform_error() {
        fn explode(_: &str, _: &str) -> Vec<KeyValue> {
            panic!("map panic!")
        }
        let units = vec![InputUnit::new("a", "x")];
        let err = run_map_stage(&FnTransform::new(explode, count), &units).unwrap_err();
        match err {
            MapReduceError::Transform { source, .. } => {
                assert_eq!(source.message(), "panicked: map panic!")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
