mod error;
mod repository;
mod types;

pub use error::GitError;
pub use repository::{REMOTE_NAME, Repository};
pub use types::{CommitInfo, PushAuth, TagInfo};

pub type Result<T> = std::result::Result<T, GitError>;
