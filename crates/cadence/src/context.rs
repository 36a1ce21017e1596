use std::path::Path;

use cadence_changelog::RepositoryInfo;
use cadence_forge::{DEFAULT_API_URL, GitHubClient, NpmRegistry};
use cadence_git::PushAuth;
use cadence_operations::OperationError;
use cadence_operations::providers::{
    FileSystemChangelogStore, FileSystemChangesetStore, FileSystemManifestStore,
    Git2VersionControl, GitHubForge, NpmRegistryClient, ShellCommandRunner,
};
use cadence_project::Project;
use clap::Args;
use tracing::debug;

use crate::error::Result;

const REGISTRY_TOKEN_ENV: &str = "NPM_TOKEN";

/// Credentials and endpoints, usually provided by the CI environment.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct RemoteArgs {
    /// Token for forge API calls and for pushing over HTTPS
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub(crate) token: Option<String>,

    /// Forge API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub(crate) api_url: String,

    /// Registry token, passed to the publish command as NPM_TOKEN
    #[arg(long, env = "NPM_TOKEN", hide_env_values = true, global = true)]
    pub(crate) npm_token: Option<String>,
}

/// A loaded project plus the providers commands are built from.
pub(crate) struct Context {
    pub(crate) project: Project,
    remote: RemoteArgs,
}

impl Context {
    pub(crate) fn load(start_path: &Path, remote: RemoteArgs) -> Result<Self> {
        let project = Project::discover(start_path)?;
        debug!(root = %project.root.display(), "project loaded");
        Ok(Self { project, remote })
    }

    pub(crate) fn changesets(&self) -> FileSystemChangesetStore {
        FileSystemChangesetStore::new(&self.project.root, self.project.config.changeset_dir())
    }

    pub(crate) fn manifests(&self) -> Result<FileSystemManifestStore> {
        Ok(FileSystemManifestStore::new(
            &self.project.root,
            self.project.ignore_rules()?,
        ))
    }

    pub(crate) fn changelogs(&self) -> FileSystemChangelogStore {
        FileSystemChangelogStore::new(&self.project.root)
    }

    pub(crate) fn vcs(&self) -> Git2VersionControl {
        let auth = match &self.remote.token {
            Some(token) => PushAuth::Token(token.clone()),
            None => PushAuth::Ambient,
        };
        Git2VersionControl::new(&self.project.root, auth)
    }

    pub(crate) fn runner(&self) -> ShellCommandRunner {
        ShellCommandRunner::new()
    }

    pub(crate) fn forge(&self) -> Result<GitHubForge> {
        let url = self
            .project
            .config
            .repository()
            .ok_or(OperationError::MissingRepository)?;
        let info = RepositoryInfo::from_url(url)?;
        let client = GitHubClient::new(
            &self.remote.api_url,
            info.owner,
            info.repo,
            self.remote.token.clone(),
        )?;
        Ok(GitHubForge::new(client))
    }

    pub(crate) fn registry(&self) -> Result<NpmRegistryClient> {
        let registry = NpmRegistry::new(
            self.project.config.registry(),
            self.remote.npm_token.clone(),
        )?;
        Ok(NpmRegistryClient::new(registry))
    }

    /// Environment handed to the publish command.
    pub(crate) fn publish_env(&self) -> Vec<(String, String)> {
        self.remote
            .npm_token
            .iter()
            .map(|token| (REGISTRY_TOKEN_ENV.to_string(), token.clone()))
            .collect()
    }
}
