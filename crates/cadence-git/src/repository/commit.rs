use crate::{CommitInfo, Result};

use super::Repository;

impl Repository {
    /// Stages every change in the working tree, deletions included.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be updated.
    pub fn stage_all(&self) -> Result<()> {
        let mut index = self.inner.index()?;

        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        Ok(())
    }

    /// Stages everything and commits it on top of HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or committing fails.
    pub fn commit_all(&self, message: &str) -> Result<CommitInfo> {
        self.stage_all()?;

        let sig = self.signature()?;
        let mut index = self.inner.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;

        let parent = self.inner.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let commit_oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        Ok(CommitInfo {
            sha: commit_oid.to_string(),
            message: message.to_string(),
        })
    }
}
