use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("missing opening delimiter '---'")]
    MissingOpeningDelimiter,

    #[error("missing closing delimiter '---'")]
    MissingClosingDelimiter,

    #[error("front matter is empty")]
    EmptyFrontMatter,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("input exceeds maximum size of {max_bytes} bytes")]
    InputTooLarge { max_bytes: usize },

    #[error("invalid changeset filename '{file_name}': {reason}")]
    InvalidFilename {
        file_name: String,
        reason: &'static str,
    },

    #[error("changeset type must not be empty")]
    EmptyType,

    #[error("package name must not be empty")]
    EmptyPackage,

    #[error("pull request number must be positive")]
    InvalidPullRequest,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
