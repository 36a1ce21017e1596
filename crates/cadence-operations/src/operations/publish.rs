use std::fmt;

use cadence_changelog::{CHANGELOG_FILE_NAME, ChangelogLayout};
use cadence_core::Package;
use cadence_forge::ReleaseDraft;
use cadence_project::Project;
use cadence_version::{ReleaseChannel, Semver, release_channel};
use tracing::{debug, info, warn};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ChangelogStore, ChangesetStore, CommandRunner, ForgeClient, ManifestStore, RegistryClient,
    VersionControl,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPackage {
    pub name: String,
    pub version: String,
    pub channel: ReleaseChannel,
    pub tag: String,
    pub release_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Private,
    AlreadyPublished,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => f.write_str("private"),
            Self::AlreadyPublished => f.write_str("already published"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPackage {
    pub name: String,
    pub version: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub enum PublishOutcome {
    /// The release pull request has not been merged yet.
    PendingChangesets { count: usize },
    Published {
        packages: Vec<PublishedPackage>,
        skipped: Vec<SkippedPackage>,
    },
}

/// Publishes every package whose manifest version is not yet on the
/// registry, then tags and announces it. Each package's tag is pushed and
/// its release created before the next package is published.
pub struct PublishOperation<S, M, L, V, F, R, X> {
    changesets: S,
    manifests: M,
    changelogs: L,
    vcs: V,
    forge: F,
    registry: R,
    runner: X,
    env: Vec<(String, String)>,
}

impl<S, M, L, V, F, R, X> PublishOperation<S, M, L, V, F, R, X>
where
    S: ChangesetStore,
    M: ManifestStore,
    L: ChangelogStore,
    V: VersionControl,
    F: ForgeClient,
    R: RegistryClient,
    X: CommandRunner,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        changesets: S,
        manifests: M,
        changelogs: L,
        vcs: V,
        forge: F,
        registry: R,
        runner: X,
    ) -> Self {
        Self {
            changesets,
            manifests,
            changelogs,
            vcs,
            forge,
            registry,
            runner,
            env: Vec::new(),
        }
    }

    /// Extra environment for the publish command, such as a registry token.
    #[must_use]
    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the registry or forge cannot be reached, a
    /// version does not parse, the publish command fails, or tags cannot be
    /// created or pushed.
    pub fn execute(&self, project: &Project) -> Result<PublishOutcome> {
        let pending = self.changesets.list_pending()?;
        if !pending.is_empty() {
            info!(count = pending.len(), "pending changesets, nothing to publish");
            return Ok(PublishOutcome::PendingChangesets {
                count: pending.len(),
            });
        }

        let layout = ChangelogLayout::new(project.config.changelog_heading_level())?;
        let mut packages = Vec::new();
        let mut skipped = Vec::new();

        for package in self.manifests.scan_packages()? {
            match self.publish_package(project, &package)? {
                Ok(mut entry) => {
                    self.vcs.push_tags(std::slice::from_ref(&entry.tag))?;
                    entry.release_url = Some(self.create_release(layout, &package, &entry)?);
                    packages.push(entry);
                }
                Err(reason) => {
                    debug!(package = %package.name, %reason, "skipping package");
                    skipped.push(SkippedPackage {
                        name: package.name,
                        version: package.version,
                        reason,
                    });
                }
            }
        }

        Ok(PublishOutcome::Published { packages, skipped })
    }

    /// The outer result carries failures; the inner one says whether the
    /// package was published or why it was skipped.
    fn publish_package(
        &self,
        project: &Project,
        package: &Package,
    ) -> Result<std::result::Result<PublishedPackage, SkipReason>> {
        if package.private {
            return Ok(Err(SkipReason::Private));
        }

        let published = self.registry.published_versions(&package.name)?;
        if published.iter().any(|v| v == &package.version) {
            return Ok(Err(SkipReason::AlreadyPublished));
        }

        let current = Semver::parse(&package.version).map_err(|source| {
            OperationError::InvalidVersion {
                package: package.name.clone(),
                version: package.version.clone(),
                source,
            }
        })?;
        let published: Vec<Semver> = published
            .iter()
            .filter_map(|text| match Semver::parse(text) {
                Ok(version) => Some(version),
                Err(e) => {
                    debug!(package = %package.name, version = %text, error = %e, "ignoring published version");
                    None
                }
            })
            .collect();
        let channel = release_channel(&current, &published);

        let command = project
            .config
            .publish_command_for(&package.name, &package.version, channel.as_str());
        info!(package = %package.name, version = %package.version, %channel, "publishing");
        self.runner
            .run(&command, &project.root.join(&package.directory), &self.env)?;

        let tag = project.config.tag_name(&package.name, &package.version);
        self.vcs.create_tag(&tag, &tag)?;

        Ok(Ok(PublishedPackage {
            name: package.name.clone(),
            version: package.version.clone(),
            channel,
            tag,
            release_url: None,
        }))
    }

    fn create_release(
        &self,
        layout: ChangelogLayout,
        package: &Package,
        entry: &PublishedPackage,
    ) -> Result<String> {
        let draft = ReleaseDraft {
            tag_name: entry.tag.clone(),
            name: entry.tag.clone(),
            body: self.release_body(layout, package)?,
            prerelease: entry.channel == ReleaseChannel::Next,
            make_latest: entry.channel == ReleaseChannel::Latest,
        };
        let url = self.forge.create_release(&draft)?;
        info!(tag = %entry.tag, %url, "created release");
        Ok(url)
    }

    fn release_body(&self, layout: ChangelogLayout, package: &Package) -> Result<String> {
        let path = package.directory.join(CHANGELOG_FILE_NAME);
        let section = self
            .changelogs
            .read(&path)?
            .and_then(|text| layout.extract_section(&text, &package.version));
        if section.is_none() {
            warn!(package = %package.name, version = %package.version, "no changelog section for release notes");
        }
        Ok(section.unwrap_or_default())
    }
}
