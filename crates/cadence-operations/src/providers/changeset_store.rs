use std::fs;
use std::path::{Path, PathBuf};

use cadence_core::RawChangeset;
use cadence_parse::{ChangesetDraft, is_changeset_file, parse_changeset, serialize_changeset};
use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::ChangesetStore;

const MAX_ID_ATTEMPTS: usize = 100;

pub struct FileSystemChangesetStore {
    project_root: PathBuf,
    changeset_dir: PathBuf,
}

impl FileSystemChangesetStore {
    /// `changeset_dir` is relative to `project_root`.
    #[must_use]
    pub fn new(project_root: &Path, changeset_dir: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            changeset_dir: changeset_dir.to_path_buf(),
        }
    }

    fn absolute(&self, relative: &Path) -> PathBuf {
        self.project_root.join(relative)
    }
}

impl ChangesetStore for FileSystemChangesetStore {
    fn list_pending(&self) -> Result<Vec<RawChangeset>> {
        let full_dir = self.absolute(&self.changeset_dir);

        let entries = match fs::read_dir(&full_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(OperationError::ChangesetList {
                    path: full_dir,
                    source,
                });
            }
        };

        let mut file_names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| OperationError::ChangesetList {
                path: full_dir.clone(),
                source,
            })?;
            let is_file = entry.file_type().is_ok_and(|t| t.is_file());
            let path = entry.path();
            if is_file && is_changeset_file(&path) {
                file_names.push(entry.file_name());
            }
        }
        file_names.sort();

        let mut changesets = Vec::with_capacity(file_names.len());
        for file_name in file_names {
            let relative = self.changeset_dir.join(&file_name);
            let content = self.read_source(&relative)?;
            let changeset = parse_changeset(&relative, &content).map_err(|source| {
                OperationError::ChangesetParse {
                    path: self.absolute(&relative),
                    source,
                }
            })?;
            changesets.push(changeset);
        }

        debug!(count = changesets.len(), dir = %full_dir.display(), "listed pending changesets");
        Ok(changesets)
    }

    fn read_source(&self, path: &Path) -> Result<String> {
        let full_path = self.absolute(path);
        fs::read_to_string(&full_path).map_err(|source| OperationError::ChangesetFileRead {
            path: full_path,
            source,
        })
    }

    fn delete(&self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            let full_path = self.absolute(path);
            fs::remove_file(&full_path).map_err(|source| OperationError::ChangesetDelete {
                path: full_path,
                source,
            })?;
        }
        Ok(())
    }

    fn restore(&self, path: &Path, content: &str) -> Result<()> {
        let full_path = self.absolute(path);
        fs::write(&full_path, content).map_err(|source| OperationError::ChangesetFileWrite {
            path: full_path,
            source,
        })
    }

    fn create(&self, draft: &ChangesetDraft) -> Result<PathBuf> {
        let content = serialize_changeset(draft).map_err(OperationError::ChangesetSerialize)?;

        let full_dir = self.absolute(&self.changeset_dir);
        fs::create_dir_all(&full_dir).map_err(|source| OperationError::ChangesetFileWrite {
            path: full_dir.clone(),
            source,
        })?;

        let file_name = generate_unique_filename(&full_dir)?;
        let relative = self.changeset_dir.join(&file_name);
        self.restore(&relative, &content)?;

        debug!(path = %relative.display(), "created changeset");
        Ok(relative)
    }
}

fn generate_unique_filename(changeset_dir: &Path) -> Result<String> {
    for _ in 0..MAX_ID_ATTEMPTS {
        if let Some(name) = petname::petname(3, "-") {
            let filename = format!("{name}.md");

            if !changeset_dir.join(&filename).exists() {
                return Ok(filename);
            }
        }
    }

    Err(OperationError::ChangesetIdExhausted(
        changeset_dir.to_path_buf(),
    ))
}
