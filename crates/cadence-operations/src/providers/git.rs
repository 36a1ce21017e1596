use std::path::{Path, PathBuf};

use cadence_git::{CommitInfo, PushAuth, Repository, TagInfo};

use crate::Result;
use crate::traits::VersionControl;

pub struct Git2VersionControl {
    project_root: PathBuf,
    auth: PushAuth,
}

impl Git2VersionControl {
    #[must_use]
    pub fn new(project_root: &Path, auth: PushAuth) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            auth,
        }
    }

    fn open(&self) -> Result<Repository> {
        Ok(Repository::open(&self.project_root)?)
    }
}

impl VersionControl for Git2VersionControl {
    fn current_branch(&self) -> Result<String> {
        Ok(self.open()?.current_branch()?)
    }

    fn checkout_new_branch(&self, name: &str) -> Result<()> {
        Ok(self.open()?.checkout_new_branch(name)?)
    }

    fn commit_all(&self, message: &str) -> Result<CommitInfo> {
        Ok(self.open()?.commit_all(message)?)
    }

    fn push_branch(&self, name: &str) -> Result<()> {
        Ok(self.open()?.push_branch(name, &self.auth)?)
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<TagInfo> {
        Ok(self.open()?.create_tag(name, message)?)
    }

    fn push_tags(&self, names: &[String]) -> Result<()> {
        Ok(self.open()?.push_tags(names, &self.auth)?)
    }
}
