mod config;
mod discover;
mod error;
mod ignore;
mod manifest;
mod project;
mod scan;

pub const DEFAULT_CHANGESET_DIR: &str = ".changeset";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const RELEASE_CONFIG_FILE_NAME: &str = "release.toml";

pub use config::{ProjectConfig, ReleaseConfig, ReleaseFlow, load_config, load_release_config};
pub use discover::discover_packages;
pub use error::ProjectError;
pub use ignore::IgnoreRules;
pub use manifest::read_package;
pub use project::{Project, ensure_changeset_dir, find_project_root};
pub use scan::{DirEntry, EntryKind, FileLister, FsLister, scan_tree};

pub type Result<T> = std::result::Result<T, ProjectError>;
