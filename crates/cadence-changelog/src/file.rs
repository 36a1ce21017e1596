use std::io::ErrorKind;
use std::path::Path;

use crate::{ChangelogError, Result};

pub const CHANGELOG_FILE_NAME: &str = "CHANGELOG.md";

/// Reads a changelog, returning `None` when the file does not exist yet.
///
/// # Errors
///
/// Returns [`ChangelogError::Read`] for any other I/O failure.
pub fn read_changelog(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ChangelogError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// # Errors
///
/// Returns [`ChangelogError::Write`] if the file cannot be written.
pub fn write_changelog(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| ChangelogError::Write {
        path: path.to_path_buf(),
        source,
    })
}
