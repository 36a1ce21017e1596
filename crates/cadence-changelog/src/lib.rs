mod error;
mod file;
mod forge;
mod layout;
mod notes;

pub use error::ChangelogError;
pub use file::{CHANGELOG_FILE_NAME, read_changelog, write_changelog};
pub use forge::{Forge, RepositoryInfo};
pub use layout::ChangelogLayout;
pub use notes::{PackageRelease, release_notes, release_request_body, release_request_title};

pub type Result<T> = std::result::Result<T, ChangelogError>;
