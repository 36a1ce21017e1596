mod error;
mod parse;
mod serialize;

pub use error::{FormatError, FrontMatterError, ValidationError};
pub use parse::{CHANGESET_EXTENSION, changeset_id, is_changeset_file, parse_changeset};
pub use serialize::{ChangesetDraft, serialize_changeset};
