use cadence_git::{CommitInfo, TagInfo};

use crate::Result;

pub trait VersionControl: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or HEAD is detached.
    fn current_branch(&self) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the branch cannot be created or checked out.
    fn checkout_new_branch(&self, name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if staging or committing fails.
    fn commit_all(&self, message: &str) -> Result<CommitInfo>;

    /// Force-pushes `name` to the remote.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote refuses the push.
    fn push_branch(&self, name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the tag already exists.
    fn create_tag(&self, name: &str, message: &str) -> Result<TagInfo>;

    /// # Errors
    ///
    /// Returns an error if the remote refuses any tag.
    fn push_tags(&self, names: &[String]) -> Result<()>;
}
