use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MapReduceError, Result};

/// One named piece of input handed to `map`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputUnit {
    pub name: String,
    pub contents: String,
}

impl InputUnit {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        InputUnit {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Reads every path in the order given. The unit name is the path as the
/// caller spelled it. Bytes that are not UTF-8 become U+FFFD.
pub fn read_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<InputUnit>> {
    paths.iter().map(|path| read_input(path.as_ref())).collect()
}

fn read_input(path: &Path) -> Result<InputUnit> {
    let input_error = |source| MapReduceError::Input {
        path: PathBuf::from(path),
        source,
    };
    let mut file = File::open(path).map_err(input_error)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(input_error)?;
    debug!(path = %path.display(), bytes = buf.len(), "read input");

    Ok(InputUnit::new(
        path.to_string_lossy(),
        String::from_utf8_lossy(&buf),
    ))
}
