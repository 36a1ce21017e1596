use std::path::Path;

use cadence_core::{ManifestKind, Package};
use serde::Deserialize;
use tracing::debug;

use crate::error::ProjectError;

#[derive(Debug, Deserialize)]
struct PackageJson {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    private: bool,
}

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
    version: Option<VersionField>,
    publish: Option<PublishField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VersionField {
    Literal(String),
    Inherited(InheritedVersion),
}

#[derive(Debug, Deserialize)]
struct InheritedVersion {
    #[allow(dead_code)]
    workspace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PublishField {
    Enabled(bool),
    Registries(Vec<String>),
}

impl PublishField {
    fn is_private(&self) -> bool {
        match self {
            Self::Enabled(enabled) => !enabled,
            Self::Registries(registries) => registries.is_empty(),
        }
    }
}

/// Builds a [`Package`] from manifest text.
///
/// Returns `Ok(None)` for manifests that do not describe a releasable
/// package: unnamed `package.json` files, virtual Cargo workspaces, and
/// crates whose version is inherited or missing.
///
/// # Errors
///
/// Returns an error if the manifest is not valid JSON or TOML.
pub fn read_package(
    relative_path: &Path,
    kind: ManifestKind,
    content: &str,
) -> Result<Option<Package>, ProjectError> {
    let directory = relative_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let (name, version, private) = match kind {
        ManifestKind::PackageJson => {
            let manifest: PackageJson =
                serde_json::from_str(content).map_err(|source| ProjectError::PackageJsonParse {
                    path: relative_path.to_path_buf(),
                    source,
                })?;
            let (Some(name), Some(version)) = (manifest.name, manifest.version) else {
                debug!(path = %relative_path.display(), "skipping package.json without name or version");
                return Ok(None);
            };
            (name, version, manifest.private)
        }
        ManifestKind::CargoToml => {
            let manifest: CargoManifest =
                toml::from_str(content).map_err(|source| ProjectError::CargoManifestParse {
                    path: relative_path.to_path_buf(),
                    source,
                })?;
            let Some(package) = manifest.package else {
                debug!(path = %relative_path.display(), "skipping manifest without [package]");
                return Ok(None);
            };
            let Some(VersionField::Literal(version)) = package.version else {
                debug!(
                    path = %relative_path.display(),
                    "skipping crate with inherited or missing version"
                );
                return Ok(None);
            };
            let private = package.publish.as_ref().is_some_and(PublishField::is_private);
            (package.name, version, private)
        }
    };

    Ok(Some(Package {
        name,
        version,
        manifest_path: relative_path.to_path_buf(),
        directory,
        kind,
        private,
        raw_manifest: content.to_string(),
    }))
}
