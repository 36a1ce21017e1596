mod branch;
mod bump;
mod channel;
mod error;
mod resolve;
mod version;

pub use branch::ReleaseBranch;
pub use bump::bump_version;
pub use channel::{ReleaseChannel, release_channel};
pub use error::VersionError;
pub use resolve::{resolve_for_branch, resolve_for_stage};
pub use version::{Semver, parse_integer};

pub type Result<T> = std::result::Result<T, VersionError>;
