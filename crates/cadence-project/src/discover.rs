use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cadence_core::{ManifestKind, Package};
use tracing::debug;

use crate::error::ProjectError;
use crate::ignore::IgnoreRules;
use crate::manifest::read_package;
use crate::scan::{FileLister, scan_tree};

/// Finds every package manifest under `root`, ordered by manifest path.
///
/// # Errors
///
/// Returns an error if the tree cannot be listed, a manifest cannot be read
/// or parsed, or two manifests declare the same package name.
pub fn discover_packages(
    root: &Path,
    rules: &IgnoreRules,
    lister: &dyn FileLister,
) -> Result<Vec<Package>, ProjectError> {
    let mut packages = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for relative in scan_tree(root, rules, lister)? {
        let Some(kind) = relative
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(ManifestKind::from_file_name)
        else {
            continue;
        };

        let absolute = root.join(&relative);
        let content = lister
            .read_file(&absolute)
            .map_err(|source| ProjectError::ManifestRead {
                path: absolute,
                source,
            })?;

        let Some(package) = read_package(&relative, kind, &content)? else {
            continue;
        };

        if let Some(first) = seen.get(&package.name) {
            return Err(ProjectError::DuplicatePackage {
                name: package.name,
                first: first.clone(),
                second: relative,
            });
        }

        debug!(name = %package.name, version = %package.version, path = %relative.display(), "discovered package");
        seen.insert(package.name.clone(), relative);
        packages.push(package);
    }

    Ok(packages)
}
