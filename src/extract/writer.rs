//! Atomic payload writes.
//!
//! The payload is written to a temporary file in the destination directory
//! and renamed over the final name. A failed write leaves no partial file
//! behind; an existing file at the destination is replaced.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `contents` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created or
/// the temporary file cannot be written or renamed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
