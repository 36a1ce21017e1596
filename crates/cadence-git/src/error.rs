use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git operation failed")]
    Git(#[from] git2::Error),

    #[error("not a git repository: '{path}'")]
    NotARepository { path: PathBuf },

    #[error("HEAD is detached, not on a branch")]
    DetachedHead,

    #[error("remote '{name}' is not configured")]
    RemoteNotFound { name: String },

    #[error("push of '{reference}' was rejected: {message}")]
    PushRejected { reference: String, message: String },
}
