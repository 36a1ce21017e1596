use cadence_forge::NpmRegistry;

use crate::Result;
use crate::traits::RegistryClient;

pub struct NpmRegistryClient {
    registry: NpmRegistry,
}

impl NpmRegistryClient {
    #[must_use]
    pub fn new(registry: NpmRegistry) -> Self {
        Self { registry }
    }
}

impl RegistryClient for NpmRegistryClient {
    fn published_versions(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.registry.published_versions(name)?)
    }
}
