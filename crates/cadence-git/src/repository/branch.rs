use tracing::debug;

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD is not on a branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// Points `name` at the current HEAD commit, replacing any existing
    /// branch of that name, and switches HEAD to it.
    ///
    /// The index and working tree are left alone, so uncommitted release
    /// edits carry over to the new branch.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD has no commit or the branch cannot be created.
    pub fn checkout_new_branch(&self, name: &str) -> Result<()> {
        let head = self.inner.head()?.peel_to_commit()?;
        let branch = self.inner.branch(name, &head, true)?;

        let reference = branch
            .get()
            .name()
            .map(String::from)
            .ok_or_else(|| git2::Error::from_str("branch reference name is not valid UTF-8"))?;
        self.inner.set_head(&reference)?;

        debug!(branch = name, commit = %head.id(), "checked out release branch");
        Ok(())
    }
}
