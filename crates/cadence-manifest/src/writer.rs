use std::path::Path;

use cadence_core::ManifestKind;
use toml_edit::{DocumentMut, value};

use crate::error::ManifestError;

/// Returns `content` with only its package version replaced.
///
/// `Cargo.toml` keeps comments and formatting. `package.json` keeps key order
/// and is re-rendered with two-space indentation.
///
/// # Errors
///
/// Returns an error if the manifest cannot be parsed or has no package
/// section to hold a version.
pub fn set_version(
    path: &Path,
    kind: ManifestKind,
    content: &str,
    version: &str,
) -> Result<String, ManifestError> {
    match kind {
        ManifestKind::PackageJson => set_json_version(path, content, version),
        ManifestKind::CargoToml => set_toml_version(path, content, version),
    }
}

fn set_json_version(path: &Path, content: &str, version: &str) -> Result<String, ManifestError> {
    let mut manifest: serde_json::Value =
        serde_json::from_str(content).map_err(|source| ManifestError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    let object = manifest
        .as_object_mut()
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "<root object>".to_string(),
        })?;
    object.insert(
        "version".to_string(),
        serde_json::Value::String(version.to_string()),
    );

    let mut output =
        serde_json::to_string_pretty(&manifest).map_err(|source| ManifestError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    output.push('\n');
    Ok(output)
}

fn set_toml_version(path: &Path, content: &str, version: &str) -> Result<String, ManifestError> {
    let mut doc = content
        .parse::<DocumentMut>()
        .map_err(|source| ManifestError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?;

    let package = doc
        .get_mut("package")
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package".to_string(),
        })?;

    let package_table = package
        .as_table_like_mut()
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "package (as table)".to_string(),
        })?;

    package_table.insert("version", value(version));

    Ok(doc.to_string())
}

/// # Errors
///
/// Returns [`ManifestError::Write`] if the file cannot be written.
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    std::fs::write(path, content).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}
