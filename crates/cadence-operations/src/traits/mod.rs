mod changelog_store;
mod changeset_store;
mod command_runner;
mod forge_client;
mod manifest_store;
mod registry_client;
mod version_control;

pub use changelog_store::ChangelogStore;
pub use changeset_store::ChangesetStore;
pub use command_runner::CommandRunner;
pub use forge_client::ForgeClient;
pub use manifest_store::ManifestStore;
pub use registry_client::RegistryClient;
pub use version_control::VersionControl;
