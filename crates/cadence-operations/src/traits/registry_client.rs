use crate::Result;

pub trait RegistryClient: Send + Sync {
    /// Versions published for `name`; empty when the registry does not know
    /// the package.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry call fails.
    fn published_versions(&self, name: &str) -> Result<Vec<String>>;
}
