use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cadence_core::TargetStage;
use serde::Deserialize;

use crate::error::ProjectError;
use crate::{CONFIG_FILE_NAME, DEFAULT_CHANGESET_DIR, RELEASE_CONFIG_FILE_NAME};

const DEFAULT_BASE_BRANCH: &str = "main";
const DEFAULT_RELEASE_BRANCH: &str = "changeset-release/{branch}";
const DEFAULT_COMMIT_MESSAGE: &str = "chore: release packages";
const DEFAULT_PUBLISH_COMMAND: &str = "npm publish --tag {tag}";
const DEFAULT_TAG_FORMAT: &str = "{name}@{version}";
const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";
const DEFAULT_HEADING_LEVEL: u8 = 2;

/// Which state machine decides the next version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseFlow {
    /// Target-stage driven, released from the base branch.
    #[default]
    Stage,
    /// Driven by `main`/`master` and `vN` branch names.
    Branch,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    repository: Option<String>,
    base_branch: Option<String>,
    flow: Option<ReleaseFlow>,
    release_branch: Option<String>,
    commit_message: Option<String>,
    #[serde(default)]
    ignore: Vec<String>,
    format_command: Option<String>,
    deploy_command: Option<String>,
    publish_command: Option<String>,
    tag_format: Option<String>,
    registry: Option<String>,
    changelog: Option<RawChangelogConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawChangelogConfig {
    heading_level: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReleaseConfig {
    stage: Option<TargetStage>,
}

/// Project configuration with every optional setting resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    changeset_dir: PathBuf,
    repository: Option<String>,
    base_branch: String,
    flow: ReleaseFlow,
    release_branch: String,
    commit_message: String,
    ignore: Vec<String>,
    format_command: Option<String>,
    deploy_command: Option<String>,
    publish_command: String,
    tag_format: String,
    registry: String,
    changelog_heading_level: u8,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::from_raw(RawConfig::default())
    }
}

impl ProjectConfig {
    fn from_raw(raw: RawConfig) -> Self {
        Self {
            changeset_dir: PathBuf::from(DEFAULT_CHANGESET_DIR),
            repository: raw.repository,
            base_branch: raw
                .base_branch
                .unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string()),
            flow: raw.flow.unwrap_or_default(),
            release_branch: raw
                .release_branch
                .unwrap_or_else(|| DEFAULT_RELEASE_BRANCH.to_string()),
            commit_message: raw
                .commit_message
                .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
            ignore: raw.ignore,
            format_command: raw.format_command.filter(|c| !c.trim().is_empty()),
            deploy_command: raw.deploy_command.filter(|c| !c.trim().is_empty()),
            publish_command: raw
                .publish_command
                .unwrap_or_else(|| DEFAULT_PUBLISH_COMMAND.to_string()),
            tag_format: raw
                .tag_format
                .unwrap_or_else(|| DEFAULT_TAG_FORMAT.to_string()),
            registry: raw
                .registry
                .unwrap_or_else(|| DEFAULT_REGISTRY.to_string()),
            changelog_heading_level: raw
                .changelog
                .and_then(|c| c.heading_level)
                .unwrap_or(DEFAULT_HEADING_LEVEL),
        }
    }

    /// Changeset directory relative to the project root.
    #[must_use]
    pub fn changeset_dir(&self) -> &Path {
        &self.changeset_dir
    }

    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    #[must_use]
    pub fn base_branch(&self) -> &str {
        &self.base_branch
    }

    #[must_use]
    pub fn flow(&self) -> ReleaseFlow {
        self.flow
    }

    /// Head branch of the release pull request opened from `branch`.
    #[must_use]
    pub fn release_branch_for(&self, branch: &str) -> String {
        self.release_branch.replace("{branch}", branch)
    }

    #[must_use]
    pub fn commit_message(&self) -> &str {
        &self.commit_message
    }

    #[must_use]
    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    #[must_use]
    pub fn format_command(&self) -> Option<&str> {
        self.format_command.as_deref()
    }

    #[must_use]
    pub fn deploy_command(&self) -> Option<&str> {
        self.deploy_command.as_deref()
    }

    /// Publish command with `{name}`, `{version}` and `{tag}` substituted.
    #[must_use]
    pub fn publish_command_for(&self, name: &str, version: &str, tag: &str) -> String {
        expand(&self.publish_command, name, version).replace("{tag}", tag)
    }

    #[must_use]
    pub fn tag_name(&self, name: &str, version: &str) -> String {
        expand(&self.tag_format, name, version)
    }

    #[must_use]
    pub fn registry(&self) -> &str {
        &self.registry
    }

    #[must_use]
    pub fn changelog_heading_level(&self) -> u8 {
        self.changelog_heading_level
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_flow(mut self, flow: ReleaseFlow) -> Self {
        self.flow = flow;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_format_command(mut self, command: impl Into<String>) -> Self {
        self.format_command = Some(command.into());
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_deploy_command(mut self, command: impl Into<String>) -> Self {
        self.deploy_command = Some(command.into());
        self
    }
}

fn expand(template: &str, name: &str, version: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{version}", version)
}

/// Optional release-stage override, read once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReleaseConfig {
    target_stage: Option<TargetStage>,
}

impl ReleaseConfig {
    #[must_use]
    pub fn new(target_stage: Option<TargetStage>) -> Self {
        Self { target_stage }
    }

    #[must_use]
    pub fn target_stage(&self) -> Option<TargetStage> {
        self.target_stage
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ProjectError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ProjectError::ConfigRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_config(path: &Path, content: &str) -> Result<ProjectConfig, ProjectError> {
    let raw: RawConfig = toml::from_str(content).map_err(|source| ProjectError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    let config = ProjectConfig::from_raw(raw);

    if !(2..=5).contains(&config.changelog_heading_level) {
        return Err(ProjectError::InvalidConfig {
            path: path.to_path_buf(),
            reason: format!(
                "changelog.heading-level must be between 2 and 5, got {}",
                config.changelog_heading_level
            ),
        });
    }
    if config.base_branch.trim().is_empty() {
        return Err(ProjectError::InvalidConfig {
            path: path.to_path_buf(),
            reason: "base-branch must not be empty".to_string(),
        });
    }

    Ok(config)
}

/// Loads `<root>/.changeset/config.toml`; a missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read, fails to parse, contains
/// unknown keys, or holds out-of-range values.
pub fn load_config(project_root: &Path) -> Result<ProjectConfig, ProjectError> {
    let path = project_root
        .join(DEFAULT_CHANGESET_DIR)
        .join(CONFIG_FILE_NAME);

    match read_optional(&path)? {
        Some(content) => parse_config(&path, &content),
        None => Ok(ProjectConfig::default()),
    }
}

/// Loads `<root>/.changeset/release.toml`; a missing file leaves the target
/// stage unset.
///
/// # Errors
///
/// Returns an error if the file cannot be read or names an unknown stage.
pub fn load_release_config(project_root: &Path) -> Result<ReleaseConfig, ProjectError> {
    let path = project_root
        .join(DEFAULT_CHANGESET_DIR)
        .join(RELEASE_CONFIG_FILE_NAME);

    let Some(content) = read_optional(&path)? else {
        return Ok(ReleaseConfig::default());
    };

    let raw: RawReleaseConfig =
        toml::from_str(&content).map_err(|source| ProjectError::ConfigParse {
            path: path.clone(),
            source,
        })?;

    Ok(ReleaseConfig::new(raw.stage))
}
