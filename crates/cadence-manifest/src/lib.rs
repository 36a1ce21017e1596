mod error;
mod reader;
mod writer;

pub use error::ManifestError;
pub use reader::read_version;
pub use writer::{set_version, write_manifest};
