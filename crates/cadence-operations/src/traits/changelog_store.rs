use std::path::Path;

use crate::Result;

/// Changelog files, addressed relative to the project root.
pub trait ChangelogStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the file exists and cannot be removed.
    fn remove(&self, path: &Path) -> Result<()>;
}
