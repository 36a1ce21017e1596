use std::path::Path;

use cadence_core::ManifestKind;
use toml_edit::DocumentMut;

use crate::error::ManifestError;

/// Reads the literal version string of a manifest, if it has one.
///
/// # Errors
///
/// Returns an error if the manifest text cannot be parsed.
pub fn read_version(
    path: &Path,
    kind: ManifestKind,
    content: &str,
) -> Result<Option<String>, ManifestError> {
    match kind {
        ManifestKind::PackageJson => {
            let value: serde_json::Value =
                serde_json::from_str(content).map_err(|source| ManifestError::JsonParse {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(value
                .get("version")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string))
        }
        ManifestKind::CargoToml => {
            let doc = content
                .parse::<DocumentMut>()
                .map_err(|source| ManifestError::TomlParse {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(doc
                .get("package")
                .and_then(|package| package.get("version"))
                .and_then(|version| version.as_str())
                .map(str::to_string))
        }
    }
}
