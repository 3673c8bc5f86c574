//! Whole-file reads and all-or-nothing writes shared by encode and decode

use crate::error::{CompressError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Read the entire file at `path`.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(data) => {
            debug!(path = %path.display(), bytes = data.len(), "read input");
            Ok(data)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(CompressError::InputNotFound(path.to_path_buf()))
        }
        Err(source) => Err(CompressError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `data` to `path`, creating parent directories and truncating any
/// existing file.
///
/// With `atomic` set the bytes go to a temp file in the target directory
/// which is then renamed over `path`, so a failure never leaves a partial
/// file behind.
pub fn write_output(path: &Path, data: &[u8], atomic: bool) -> Result<()> {
    let unwritable = |source: std::io::Error| CompressError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(unwritable)?;

    if atomic {
        let mut tmp = NamedTempFile::new_in(parent).map_err(unwritable)?;
        tmp.write_all(data).map_err(unwritable)?;
        tmp.as_file().sync_all().map_err(unwritable)?;
        tmp.persist(path).map_err(|e| unwritable(e.error))?;
    } else {
        fs::write(path, data).map_err(unwritable)?;
    }
    debug!(path = %path.display(), bytes = data.len(), atomic, "wrote output");
    Ok(())
}
