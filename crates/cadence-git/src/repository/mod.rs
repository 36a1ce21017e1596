mod branch;
mod commit;
mod remote;
mod tag;

use std::path::{Path, PathBuf};

use crate::{GitError, Result};

pub const REMOTE_NAME: &str = "origin";

const FALLBACK_NAME: &str = "cadence";
const FALLBACK_EMAIL: &str = "cadence@users.noreply.github.com";

pub struct Repository {
    pub(crate) inner: git2::Repository,
    root: PathBuf,
}

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::NotARepository`] if the path is not inside a git repository.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|_| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        let root = inner.workdir().ok_or_else(|| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        let root = dunce::simplified(root).to_path_buf();

        Ok(Self { inner, root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configured `user.name`/`user.email`, or a bot identity when CI has
    /// none configured.
    pub(crate) fn signature(&self) -> Result<git2::Signature<'static>> {
        match self.inner.signature() {
            Ok(signature) => Ok(signature),
            Err(_) => Ok(git2::Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?),
        }
    }
}
