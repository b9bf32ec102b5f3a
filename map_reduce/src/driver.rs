use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{MapReduceError, Result};
use crate::grouping::group_by_key;
use crate::input::{read_inputs, InputUnit};
use crate::kv_store::OutputRecord;
use crate::mapper::run_map_stage;
use crate::output::write_output;
use crate::reducer::run_reduce_stage;
use crate::transform::Transform;

/// Progress of a single run. Transitions only move forward; any failure
/// goes straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Mapping,
    Grouping,
    Reducing,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub inputs: usize,
    pub intermediate_records: usize,
    pub keys: usize,
    pub output: PathBuf,
}

/// Sequences map, grouping and reduce exactly once.
pub struct Driver<T> {
    transform: T,
    config: Config,
    state: RunState,
}

impl<T: Transform> Driver<T> {
    pub fn new(transform: T, config: Config) -> Self {
        Driver {
            transform,
            config,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Reads `inputs`, runs every stage and writes the output file.
    /// Nothing is written unless every stage succeeds.
    pub fn run<P: AsRef<Path>>(&mut self, inputs: &[P]) -> Result<RunSummary> {
        self.ensure_fresh()?;
        let units = read_inputs(inputs);
        let units = self.check(units)?;

        let (intermediate_records, records) = self.run_stages(&units)?;

        let output = self.config.output.clone();
        let written = write_output(&output, &records);
        self.check(written)?;
        self.transition(RunState::Done);
        info!(output = %output.display(), keys = records.len(), "run complete");

        Ok(RunSummary {
            inputs: units.len(),
            intermediate_records,
            keys: records.len(),
            output,
        })
    }

    /// Runs every stage in memory and returns the records in key order.
    pub fn execute(&mut self, units: &[InputUnit]) -> Result<Vec<OutputRecord>> {
        self.ensure_fresh()?;
        let (_, records) = self.run_stages(units)?;
        self.transition(RunState::Done);
        Ok(records)
    }

    fn ensure_fresh(&self) -> Result<()> {
        match self.state {
            RunState::Init => Ok(()),
            state => Err(MapReduceError::InvalidState(state)),
        }
    }

    // The intermediate collection is dropped before this returns.
    fn run_stages(&mut self, units: &[InputUnit]) -> Result<(usize, Vec<OutputRecord>)> {
        self.transition(RunState::Mapping);
        let intermediate = run_map_stage(&self.transform, units);
        let intermediate = self.check(intermediate)?;
        let intermediate_records = intermediate.len();

        self.transition(RunState::Grouping);
        let groups = group_by_key(intermediate);

        self.transition(RunState::Reducing);
        let records = run_reduce_stage(&self.transform, groups);
        let records = self.check(records)?;
        Ok((intermediate_records, records))
    }

    fn check<R>(&mut self, result: Result<R>) -> Result<R> {
        if let Err(err) = &result {
            error!(state = ?self.state, "run failed: {err}");
            self.state = RunState::Failed;
        }
        result
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = ?self.state, to = ?next, "driver state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Stage, TransformError};
    use crate::kv_store::KeyValue;
    use crate::transform::FnTransform;
    use std::fs;

    fn words(_name: &str, contents: &str) -> Vec<KeyValue> {
        contents
            .split_whitespace()
            .map(|w| KeyValue::new(w, 1))
            .collect()
    }

    fn count(_key: &str, values: &[String]) -> String {
        values.len().to_string()
    }

    fn counting_driver(config: Config) -> Driver<FnTransform> {
        Driver::new(FnTransform::new(words, count), config)
    }

    struct BrokenReduce;

    impl Transform for BrokenReduce {
        fn map(&self, name: &str, contents: &str) -> std::result::Result<Vec<KeyValue>, TransformError> {
            Ok(words(name, contents))
        }

        fn reduce(&self, _: &str, _: &[String]) -> std::result::Result<String, TransformError> {
            Err(TransformError::new("reduce unavailable"))
        }
    }

    #[test]
    fn execute_counts_words() {
        let mut driver = counting_driver(Config::default());
        let records = driver
            .execute(&[InputUnit::new("doc1.txt", "the cat the dog")])
            .unwrap();
        let lines: String = records.iter().map(OutputRecord::format_line).collect();
        assert_eq!(lines, "cat 1\ndog 1\nthe 2\n");
        assert_eq!(driver.state(), RunState::Done);
    }

    #[test]
    fn run_writes_configured_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pg-a.txt");
        fs::write(&input, "a b a").unwrap();
        let output = dir.path().join("counts.txt");

        let mut driver = counting_driver(Config::default().with_output(&output));
        let summary = driver.run(&[&input]).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                inputs: 1,
                intermediate_records: 3,
                keys: 2,
                output: output.clone(),
            }
        );
        assert_eq!(fs::read_to_string(&output).unwrap(), "a 2\nb 1\n");
    }

    #[test]
    fn reduce_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "x").unwrap();
        let output = dir.path().join("mr-out-0");

        let mut driver = Driver::new(BrokenReduce, Config::default().with_output(&output));
        let err = driver.run(&[&input]).unwrap_err();

        assert!(matches!(
            err,
            MapReduceError::Transform {
                stage: Stage::Reduce,
                ..
            }
        ));
        assert_eq!(driver.state(), RunState::Failed);
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("mr-out-0");
        let mut driver = counting_driver(Config::default().with_output(&output));

        let err = driver.run(&[dir.path().join("absent.txt")]).unwrap_err();
        assert!(matches!(err, MapReduceError::Input { .. }));
        assert_eq!(driver.state(), RunState::Failed);
        assert!(!output.exists());
    }

    #[test]
    fn driver_runs_once() {
        let mut driver = counting_driver(Config::default());
        driver.execute(&[]).unwrap();
        let err = driver.execute(&[]).unwrap_err();
        assert!(matches!(err, MapReduceError::InvalidState(RunState::Done)));
    }
}
