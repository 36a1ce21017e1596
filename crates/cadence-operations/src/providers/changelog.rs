use std::fs;
use std::path::{Path, PathBuf};

use cadence_changelog::{ChangelogError, read_changelog, write_changelog};

use crate::Result;
use crate::traits::ChangelogStore;

pub struct FileSystemChangelogStore {
    project_root: PathBuf,
}

impl FileSystemChangelogStore {
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }
}

impl ChangelogStore for FileSystemChangelogStore {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(read_changelog(&self.project_root.join(path))?)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        Ok(write_changelog(&self.project_root.join(path), content)?)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let full_path = self.project_root.join(path);
        match fs::remove_file(&full_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ChangelogError::Write {
                path: full_path,
                source,
            }
            .into()),
        }
    }
}
