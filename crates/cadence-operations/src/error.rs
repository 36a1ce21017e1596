use std::path::PathBuf;

use cadence_forge::ForgeError;
use cadence_version::VersionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] cadence_core::CoreError),

    #[error(transparent)]
    Git(#[from] cadence_git::GitError),

    #[error(transparent)]
    Project(#[from] cadence_project::ProjectError),

    #[error(transparent)]
    Manifest(#[from] cadence_manifest::ManifestError),

    #[error(transparent)]
    Changelog(#[from] cadence_changelog::ChangelogError),

    #[error("{}", describe_service_failure(.target, .status.to_owned()))]
    ExternalService {
        target: String,
        status: Option<u16>,
        #[source]
        source: ForgeError,
    },

    #[error("cannot resolve the next version of '{package}'")]
    Resolve {
        package: String,
        #[source]
        source: VersionError,
    },

    #[error("package '{package}' has an invalid version '{version}'")]
    InvalidVersion {
        package: String,
        version: String,
        #[source]
        source: VersionError,
    },

    #[error("failed to parse changeset file '{path}'")]
    ChangesetParse {
        path: PathBuf,
        #[source]
        source: cadence_parse::FormatError,
    },

    #[error("failed to read changeset file '{path}'")]
    ChangesetFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write changeset file '{path}'")]
    ChangesetFileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete changeset file '{path}'")]
    ChangesetDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list changeset files in '{path}'")]
    ChangesetList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize changeset")]
    ChangesetSerialize(#[source] cadence_parse::FormatError),

    #[error("could not find a free changeset id in '{0}'")]
    ChangesetIdExhausted(PathBuf),

    #[error("unknown package '{name}' (available: {available})")]
    UnknownPackage { name: String, available: String },

    #[error("changeset description cannot be empty")]
    EmptyDescription,

    #[error("no repository URL configured; set `repository` in .changeset/config.toml")]
    MissingRepository,

    #[error("failed to start command `{command}`")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` exited with {}", describe_exit(.code.to_owned()))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("release writes were rolled back")]
    RolledBack(#[source] Box<OperationError>),

    #[error("rollback incomplete, restore manually: {}", .failures.join("; "))]
    Rollback {
        failures: Vec<String>,
        #[source]
        cause: Box<OperationError>,
    },
}

impl From<ForgeError> for OperationError {
    fn from(source: ForgeError) -> Self {
        Self::ExternalService {
            target: source.target().unwrap_or("forge client").to_string(),
            status: source.status(),
            source,
        }
    }
}

fn describe_service_failure(target: &str, status: Option<u16>) -> String {
    match status {
        Some(status) => format!("external service call {target} failed with status {status}"),
        None => format!("external service call {target} failed"),
    }
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |code| format!("status {code}"))
}

pub type Result<T> = std::result::Result<T, OperationError>;
