use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::driver::RunState;

pub type Result<T> = std::result::Result<T, MapReduceError>;

/// Stage a transform callable was running in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Map,
    Reduce,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Map => write!(f, "map"),
            Stage::Reduce => write!(f, "reduce"),
        }
    }
}

/// Failure raised by an application's map or reduce function.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        TransformError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug)]
pub enum MapReduceError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot read input {path}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `unit` is the input name for the map stage and the key for the reduce stage.
    #[error("{stage} failed on {unit:?}")]
    Transform {
        stage: Stage,
        unit: String,
        #[source]
        source: TransformError,
    },

    #[error("cannot write output {path}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("driver cannot start a run from state {0:?}")]
    InvalidState(RunState),
}

impl MapReduceError {
    pub(crate) fn transform(stage: Stage, unit: impl Into<String>, source: TransformError) -> Self {
        MapReduceError::Transform {
            stage,
            unit: unit.into(),
            source,
        }
    }
}
