//! Text I/O with path-carrying errors

use crate::{Error, NormalizedPath, Result};
use std::fs;

/// Read text content from a file.
///
/// Refuses directories up front so callers get a precise error instead of
/// an OS-specific read failure.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    if native_path.is_dir() {
        return Err(Error::IsDirectory { path: native_path });
    }
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// List the names of the entries of `dir` that start with `prefix`, sorted.
///
/// A missing directory yields an empty list.
pub fn entries_with_prefix(dir: &NormalizedPath, prefix: &str) -> Result<Vec<String>> {
    let native_dir = dir.to_native();
    if !native_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&native_dir).map_err(|e| Error::io(&native_dir, e))?;
    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort();
    Ok(names)
}
