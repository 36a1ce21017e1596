use cadence_changelog::ChangelogError;
use cadence_forge::ForgeError;
use cadence_operations::OperationError;
use cadence_project::ProjectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("failed to set up the forge client")]
    Forge(#[from] ForgeError),

    #[error("invalid repository URL in configuration")]
    Repository(#[from] ChangelogError),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// The error and its causes, outermost first.
pub(crate) fn error_chain(error: &CliError) -> Vec<String> {
    let mut chain = vec![error.to_string()];
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}
