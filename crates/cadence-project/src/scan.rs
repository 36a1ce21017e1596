use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ProjectError;
use crate::ignore::IgnoreRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Read access to a directory tree.
pub trait FileLister: Send + Sync {
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be listed.
    fn list_dir(&self, dir: &Path) -> std::io::Result<Vec<DirEntry>>;

    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    fn read_file(&self, path: &Path) -> std::io::Result<String>;
}

/// [`FileLister`] over the real filesystem. Symlinks are reported as such
/// and never followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl FileLister for FsLister {
    fn list_dir(&self, dir: &Path) -> std::io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            let Ok(name) = entry.file_name().into_string() else {
                debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            entries.push(DirEntry { name, kind });
        }
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Lists every file under `root` that `rules` does not exclude.
///
/// Returned paths are relative to `root` and sorted, so the result does not
/// depend on directory enumeration order. Ignored directories are not
/// descended into and symlinks are skipped.
///
/// # Errors
///
/// Returns [`ProjectError::ReadDir`] if a directory cannot be listed.
pub fn scan_tree(
    root: &Path,
    rules: &IgnoreRules,
    lister: &dyn FileLister,
) -> Result<Vec<PathBuf>, ProjectError> {
    let mut files = Vec::new();
    let mut pending = vec![PathBuf::new()];

    while let Some(relative_dir) = pending.pop() {
        let absolute_dir = root.join(&relative_dir);
        let entries = lister
            .list_dir(&absolute_dir)
            .map_err(|source| ProjectError::ReadDir {
                path: absolute_dir.clone(),
                source,
            })?;

        for entry in entries {
            let relative = relative_dir.join(&entry.name);
            if rules.is_ignored(&relative, entry.kind == EntryKind::Dir) {
                continue;
            }
            match entry.kind {
                EntryKind::File => files.push(relative),
                EntryKind::Dir => pending.push(relative),
                EntryKind::Symlink => {}
            }
        }
    }

    files.sort();
    Ok(files)
}
