use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unrecognized change type '{token}' (expected patch, minor, major or next)")]
    UnknownChangeType { token: String },

    #[error("unrecognized target stage '{token}' (expected stable or beta)")]
    UnknownTargetStage { token: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
