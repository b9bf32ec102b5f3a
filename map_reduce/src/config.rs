use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{MapReduceError, Result};

pub const DEFAULT_OUTPUT: &str = "mr-out-0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Destination for the reduce output, replaced on every run.
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Config {
    /// Loads a JSON config file such as `{"output": "out/wc.txt"}`.
    /// Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Config> {
        let mut buf = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut buf))
            .map_err(|err| {
                MapReduceError::Configuration(format!(
                    "cannot read config file {}: {err}",
                    path.display()
                ))
            })?;
        Config::from_json(&buf).map_err(|err| match err {
            MapReduceError::Configuration(msg) => {
                MapReduceError::Configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(json: &str) -> Result<Config> {
        serde_json::from_str(json)
            .map_err(|err| MapReduceError::Configuration(format!("invalid config: {err}")))
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}
