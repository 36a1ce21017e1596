use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("'{input}' is not a valid non-negative integer")]
    InvalidInteger { input: String },

    #[error(
        "'{input}' is not a valid version (expected MAJOR.MINOR.PATCH or MAJOR.MINOR.PATCH-next.N)"
    )]
    InvalidVersionFormat { input: String },

    #[error("no changesets to resolve a version from")]
    MissingChangesets,

    #[error("stable version {version} cannot consume next changesets: {}", .changesets.join(", "))]
    InvalidChangesetForStage {
        version: String,
        changesets: Vec<String>,
    },

    #[error("branch v{branch_major} cannot release from version {current}")]
    InvalidBranchVersion { branch_major: u64, current: String },

    #[error("major changesets cannot be released on branch v{branch_major}: {}", .changesets.join(", "))]
    MajorBumpOnReleaseLine {
        branch_major: u64,
        changesets: Vec<String>,
    },

    #[error("version {version} cannot be bumped further")]
    Overflow { version: String },
}
