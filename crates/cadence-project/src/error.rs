use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no '{marker}' directory found traversing up from '{start_dir}'")]
    NotFound {
        start_dir: PathBuf,
        marker: &'static str,
    },

    #[error("failed to read configuration at '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration at '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration at '{path}': {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("failed to list directory '{path}'")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read manifest at '{path}'")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest at '{path}'")]
    CargoManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse manifest at '{path}'")]
    PackageJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("package '{name}' is declared by both '{first}' and '{second}'")]
    DuplicatePackage {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("invalid glob pattern '{pattern}'")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to create directory '{path}'")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
