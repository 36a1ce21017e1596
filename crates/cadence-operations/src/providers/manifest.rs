use std::path::{Path, PathBuf};

use cadence_core::Package;
use cadence_manifest::{set_version, write_manifest};
use cadence_project::{FsLister, IgnoreRules, discover_packages};

use crate::Result;
use crate::traits::ManifestStore;

pub struct FileSystemManifestStore {
    project_root: PathBuf,
    rules: IgnoreRules,
}

impl FileSystemManifestStore {
    #[must_use]
    pub fn new(project_root: &Path, rules: IgnoreRules) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            rules,
        }
    }
}

impl ManifestStore for FileSystemManifestStore {
    fn scan_packages(&self) -> Result<Vec<Package>> {
        Ok(discover_packages(&self.project_root, &self.rules, &FsLister)?)
    }

    fn render_version(&self, package: &Package, version: &str) -> Result<String> {
        let raw = package.raw_manifest.clone();
        Ok(set_version(
            &self.project_root.join(&package.manifest_path),
            package.kind,
            &raw,
            version,
        )?)
    }

    fn write_manifest(&self, package: &Package, content: &str) -> Result<()> {
        Ok(write_manifest(
            &self.project_root.join(&package.manifest_path),
            content,
        )?)
    }
}
