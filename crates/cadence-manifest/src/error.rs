use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to write manifest at '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML at '{path}'")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("failed to parse JSON at '{path}'")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required field '{field}' in '{path}'")]
    MissingField { path: PathBuf, field: String },
}
