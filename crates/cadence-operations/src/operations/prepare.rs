use std::path::PathBuf;

use cadence_changelog::{
    CHANGELOG_FILE_NAME, ChangelogLayout, PackageRelease, RepositoryInfo, release_notes,
    release_request_body, release_request_title,
};
use cadence_forge::{PullRequestDraft, PullRequestRef};
use cadence_project::Project;
use tracing::{debug, info};

use super::classify::{attribute, classify};
use super::journal::WriteJournal;
use super::plan::{ReleasePlan, plan_release, release_target};
use crate::Result;
use crate::traits::{
    ChangelogStore, ChangesetStore, CommandRunner, ForgeClient, ManifestStore, VersionControl,
};
use crate::types::DroppedChangeset;

#[derive(Debug, Clone, Default)]
pub struct PrepareInput {
    /// Overrides the current git branch in the branch flow.
    pub branch: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum PrepareOutcome {
    /// No pending changesets; the deploy command ran if one is configured.
    NoChangesets { deployed: bool },
    /// The branch flow is configured and this branch does not release.
    SkippedBranch,
    /// Changesets exist but none resolved to a version change.
    NothingToRelease { dropped: Vec<DroppedChangeset> },
    DryRun(ReleasePlan),
    Prepared {
        plan: ReleasePlan,
        release_branch: String,
        pull_request: PullRequestRef,
        created: bool,
    },
}

/// File contents for one package, rendered before anything is written.
struct RenderedUpdate {
    changelog_path: PathBuf,
    previous_changelog: Option<String>,
    changelog: String,
    manifest: String,
    version: String,
}

/// Turns pending changesets into a release pull request.
pub struct PrepareOperation<S, M, L, V, F, X> {
    changesets: S,
    manifests: M,
    changelogs: L,
    vcs: V,
    forge: F,
    runner: X,
}

impl<S, M, L, V, F, X> PrepareOperation<S, M, L, V, F, X>
where
    S: ChangesetStore,
    M: ManifestStore,
    L: ChangelogStore,
    V: VersionControl,
    F: ForgeClient,
    X: CommandRunner,
{
    pub fn new(changesets: S, manifests: M, changelogs: L, vcs: V, forge: F, runner: X) -> Self {
        Self {
            changesets,
            manifests,
            changelogs,
            vcs,
            forge,
            runner,
        }
    }

    /// # Errors
    ///
    /// Returns an error if a changeset is malformed, a version fails to
    /// resolve, a write fails (after restoring earlier writes), or a git or
    /// forge call fails.
    pub fn execute(&self, project: &Project, input: &PrepareInput) -> Result<PrepareOutcome> {
        let pending = self.changesets.list_pending()?;
        if pending.is_empty() {
            let deployed = self.deploy(project)?;
            return Ok(PrepareOutcome::NoChangesets { deployed });
        }

        let Some(target) = release_target(project, input.branch.as_deref(), &self.vcs)? else {
            return Ok(PrepareOutcome::SkippedBranch);
        };

        let packages = self.manifests.scan_packages()?;
        let classification = classify(&pending, &packages);
        let mut plan = plan_release(&packages, classification, target.mode)?;

        if plan.updates.is_empty() {
            info!(dropped = plan.dropped.len(), "no package needs a release");
            return Ok(PrepareOutcome::NothingToRelease {
                dropped: plan.dropped,
            });
        }

        if input.dry_run {
            info!(packages = plan.updates.len(), "dry run, nothing written");
            return Ok(PrepareOutcome::DryRun(plan));
        }

        let repository = project
            .config
            .repository()
            .map(RepositoryInfo::from_url)
            .transpose()?;

        attribute(
            &self.forge,
            plan.updates
                .iter_mut()
                .flat_map(|update| update.changesets.iter_mut()),
        );

        let layout = ChangelogLayout::new(project.config.changelog_heading_level())?;
        let rendered = self.render(&plan, layout, repository.as_ref())?;

        let mut journal = WriteJournal::new();
        if let Err(cause) = self.apply(project, &plan, &rendered, &mut journal) {
            return Err(journal.rollback(cause));
        }
        journal.commit();

        let release_branch = project.config.release_branch_for(&target.base_branch);
        self.vcs.checkout_new_branch(&release_branch)?;
        let commit = self.vcs.commit_all(project.config.commit_message())?;
        self.vcs.push_branch(&release_branch)?;
        info!(branch = %release_branch, sha = %commit.sha, "pushed release branch");

        let releases: Vec<PackageRelease<'_>> = plan
            .updates
            .iter()
            .zip(&rendered)
            .map(|(update, rendered)| PackageRelease {
                name: &update.package.name,
                version: &rendered.version,
                changes: &update.changesets,
            })
            .collect();
        let title = release_request_title(&releases);
        let body = release_request_body(&releases, repository.as_ref());

        let (pull_request, created) = match self
            .forge
            .find_open_pull_request(&release_branch, &target.base_branch)?
        {
            Some(existing) => {
                debug!(number = existing.number, "updating existing release pull request");
                (
                    self.forge.update_pull_request(existing.number, &title, &body)?,
                    false,
                )
            }
            None => {
                let draft = PullRequestDraft {
                    title,
                    body,
                    head: release_branch.clone(),
                    base: target.base_branch.clone(),
                };
                (self.forge.create_pull_request(&draft)?, true)
            }
        };
        info!(number = pull_request.number, created, "release pull request ready");

        Ok(PrepareOutcome::Prepared {
            plan,
            release_branch,
            pull_request,
            created,
        })
    }

    fn deploy(&self, project: &Project) -> Result<bool> {
        let Some(command) = project.config.deploy_command() else {
            info!("no pending changesets");
            return Ok(false);
        };
        info!(%command, "no pending changesets, running deploy command");
        self.runner.run(command, &project.root, &[])?;
        Ok(true)
    }

    fn render(
        &self,
        plan: &ReleasePlan,
        layout: ChangelogLayout,
        repository: Option<&RepositoryInfo>,
    ) -> Result<Vec<RenderedUpdate>> {
        plan.updates
            .iter()
            .map(|update| {
                let version = update.next_version.to_string();
                let changelog_path = update.package.directory.join(CHANGELOG_FILE_NAME);
                let previous_changelog = self.changelogs.read(&changelog_path)?;
                let notes =
                    release_notes(&update.changesets, layout.version_level() + 1, repository);
                let changelog = layout.reconcile(
                    previous_changelog.as_deref(),
                    &update.package.name,
                    &version,
                    &notes,
                );
                let manifest = self.manifests.render_version(&update.package, &version)?;

                Ok(RenderedUpdate {
                    changelog_path,
                    previous_changelog,
                    changelog,
                    manifest,
                    version,
                })
            })
            .collect()
    }

    fn apply<'a>(
        &'a self,
        project: &Project,
        plan: &'a ReleasePlan,
        rendered: &'a [RenderedUpdate],
        journal: &mut WriteJournal<'a>,
    ) -> Result<()> {
        for (update, rendered) in plan.updates.iter().zip(rendered) {
            let path = &rendered.changelog_path;
            let previous = rendered.previous_changelog.as_deref();
            self.changelogs.write(path, &rendered.changelog)?;
            journal.record(format!("restore {}", path.display()), move || match previous {
                Some(content) => self.changelogs.write(path, content),
                None => self.changelogs.remove(path),
            });

            let package = &update.package;
            self.manifests.write_manifest(package, &rendered.manifest)?;
            journal.record(
                format!("restore {}", package.manifest_path.display()),
                move || self.manifests.write_manifest(package, &package.raw_manifest),
            );
        }

        if let Some(command) = project.config.format_command() {
            debug!(%command, "running format command");
            self.runner.run(command, &project.root, &[])?;
        }

        let consumed = plan.consumed_paths();
        let sources = consumed
            .iter()
            .map(|path| Ok((path.clone(), self.changesets.read_source(path)?)))
            .collect::<Result<Vec<_>>>()?;
        for (path, content) in sources {
            self.changesets.delete(std::slice::from_ref(&path))?;
            journal.record(format!("restore {}", path.display()), move || {
                self.changesets.restore(&path, &content)
            });
        }
        debug!(count = consumed.len(), "deleted consumed changesets");

        Ok(())
    }
}
