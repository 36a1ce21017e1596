use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ProjectConfig, ReleaseConfig, load_config, load_release_config};
use crate::error::ProjectError;
use crate::ignore::IgnoreRules;
use crate::{DEFAULT_CHANGESET_DIR, Result};

/// A repository managed by cadence, with its configuration loaded.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
    pub release: ReleaseConfig,
}

impl Project {
    /// Locates the project root from `start_dir` and loads its configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError` if no root can be found or configuration is
    /// invalid.
    pub fn discover(start_dir: &Path) -> Result<Self> {
        let root = find_project_root(start_dir)?;
        Self::load(root)
    }

    /// # Errors
    ///
    /// Returns `ProjectError` if configuration cannot be read or is invalid.
    pub fn load(root: PathBuf) -> Result<Self> {
        let config = load_config(&root)?;
        let release = load_release_config(&root)?;
        debug!(root = %root.display(), flow = ?config.flow(), stage = ?release.target_stage(), "loaded project");
        Ok(Self {
            root,
            config,
            release,
        })
    }

    #[must_use]
    pub fn changeset_dir(&self) -> PathBuf {
        self.root.join(self.config.changeset_dir())
    }

    /// Ignore rules from defaults, the root `.gitignore` and `ignore` config.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError` if `.gitignore` cannot be read or holds an
    /// invalid pattern.
    pub fn ignore_rules(&self) -> Result<IgnoreRules> {
        let path = self.root.join(".gitignore");
        let gitignore = match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => return Err(ProjectError::ConfigRead { path, source }),
        };
        IgnoreRules::from_gitignore(gitignore.as_deref(), self.config.ignore())
    }
}

/// Walks up from `start_dir` to the first directory containing the
/// changeset directory.
///
/// # Errors
///
/// Returns [`ProjectError::NotFound`] when no ancestor has one.
pub fn find_project_root(start_dir: &Path) -> Result<PathBuf> {
    let start_dir = dunce::canonicalize(start_dir).map_err(|_| ProjectError::NotFound {
        start_dir: start_dir.to_path_buf(),
        marker: DEFAULT_CHANGESET_DIR,
    })?;

    start_dir
        .ancestors()
        .find(|dir| dir.join(DEFAULT_CHANGESET_DIR).is_dir())
        .map(Path::to_path_buf)
        .ok_or(ProjectError::NotFound {
            start_dir,
            marker: DEFAULT_CHANGESET_DIR,
        })
}

/// # Errors
///
/// Returns [`ProjectError::CreateDir`] if directory creation fails.
pub fn ensure_changeset_dir(root: &Path) -> Result<PathBuf> {
    let dir = root.join(DEFAULT_CHANGESET_DIR);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|source| ProjectError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }
    Ok(dir)
}
