use cadence_core::Package;

use crate::Result;

pub trait ManifestStore: Send + Sync {
    /// Every package in the project, ordered by manifest path.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails or two packages share a name.
    fn scan_packages(&self) -> Result<Vec<Package>>;

    /// Manifest text of `package` with only its version replaced. Works on a
    /// copy of the raw manifest; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the raw manifest cannot be parsed.
    fn render_version(&self, package: &Package, version: &str) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the manifest file cannot be written.
    fn write_manifest(&self, package: &Package, content: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    fn write_version(&self, package: &Package, version: &str) -> Result<()> {
        let content = self.render_version(package, version)?;
        self.write_manifest(package, &content)
    }
}
