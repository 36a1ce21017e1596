mod error;
mod github;
mod http;
mod npm;
mod types;

pub use error::ForgeError;
pub use github::{DEFAULT_API_URL, GitHubClient};
pub use npm::{DEFAULT_REGISTRY_URL, NpmRegistry};
pub use types::{CommitRef, PullRequestDraft, PullRequestRef, ReleaseDraft};

pub type Result<T> = std::result::Result<T, ForgeError>;
