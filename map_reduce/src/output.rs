use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::debug;

use crate::error::{MapReduceError, Result};
use crate::kv_store::OutputRecord;

/// Writes one `"<key> <value>"` line per record, replacing `path`.
///
/// Lines go to a temporary file next to `path` that is renamed into place
/// once complete, so a failed write leaves any previous file untouched.
/// A replaced file keeps its permissions; a new one gets `0666` minus the umask.
pub fn write_output(path: &Path, records: &[OutputRecord]) -> Result<()> {
    let output_error = |source| MapReduceError::Output {
        path: PathBuf::from(path),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let file = builder.tempfile_in(dir).map_err(output_error)?;
    if let Ok(existing) = fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(output_error)?;
    }

    let mut writer = BufWriter::new(file);
    for record in records {
        writer
            .write_all(record.format_line().as_bytes())
            .map_err(output_error)?;
    }
    let file = writer
        .into_inner()
        .map_err(|err| output_error(err.into_error()))?;
    file.persist(path).map_err(|err| output_error(err.error))?;

    debug!(path = %path.display(), records = records.len(), "wrote output");
    Ok(())
}
