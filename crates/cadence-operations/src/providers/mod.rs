mod changelog;
mod changeset_store;
mod git;
mod github;
mod manifest;
mod npm;
mod shell;

pub use changelog::FileSystemChangelogStore;
pub use changeset_store::FileSystemChangesetStore;
pub use git::Git2VersionControl;
pub use github::GitHubForge;
pub use manifest::FileSystemManifestStore;
pub use npm::NpmRegistryClient;
pub use shell::ShellCommandRunner;
