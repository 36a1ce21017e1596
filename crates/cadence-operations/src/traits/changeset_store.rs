use std::path::{Path, PathBuf};

use cadence_core::RawChangeset;
use cadence_parse::ChangesetDraft;

use crate::Result;

/// Pending changeset files. Paths are relative to the project root.
pub trait ChangesetStore: Send + Sync {
    /// Pending changesets ordered by file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed or any changeset
    /// file is malformed.
    fn list_pending(&self) -> Result<Vec<RawChangeset>>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_source(&self, path: &Path) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error on the first file that cannot be removed.
    fn delete(&self, paths: &[PathBuf]) -> Result<()>;

    /// Writes `content` back to `path`, undoing a [`delete`](Self::delete).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn restore(&self, path: &Path, content: &str) -> Result<()>;

    /// Writes a new changeset under a fresh id and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be serialized or written.
    fn create(&self, draft: &ChangesetDraft) -> Result<PathBuf>;
}
