use std::path::PathBuf;

use cadence_core::{Package, TargetStage};
use cadence_project::{Project, ReleaseFlow};
use cadence_version::{ReleaseBranch, Semver, VersionError, resolve_for_branch, resolve_for_stage};
use tracing::{debug, info};

use crate::error::OperationError;
use crate::operations::classify::Classification;
use crate::traits::VersionControl;
use crate::{DroppedChangeset, ReleaseUpdate, Result};

/// Which resolution table applies to this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    Stage(Option<TargetStage>),
    Branch(ReleaseBranch),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub mode: ResolutionMode,
    /// Branch the release pull request merges into.
    pub base_branch: String,
}

/// Works out the resolution mode from the configured flow.
///
/// Returns `None` when the branch flow is configured and `branch` (or the
/// current branch) is neither `main`/`master` nor `vN`.
///
/// # Errors
///
/// Returns an error if the current branch cannot be determined.
pub fn release_target<V>(
    project: &Project,
    branch: Option<&str>,
    vcs: &V,
) -> Result<Option<ReleaseTarget>>
where
    V: VersionControl + ?Sized,
{
    match project.config.flow() {
        ReleaseFlow::Stage => Ok(Some(ReleaseTarget {
            mode: ResolutionMode::Stage(project.release.target_stage()),
            base_branch: project.config.base_branch().to_string(),
        })),
        ReleaseFlow::Branch => {
            let branch = match branch {
                Some(branch) => branch.to_string(),
                None => vcs.current_branch()?,
            };
            let Some(release_branch) = ReleaseBranch::parse(&branch) else {
                info!(%branch, "branch does not take part in releases, nothing to do");
                return Ok(None);
            };
            Ok(Some(ReleaseTarget {
                mode: ResolutionMode::Branch(release_branch),
                base_branch: branch,
            }))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleasePlan {
    /// In package discovery order.
    pub updates: Vec<ReleaseUpdate>,
    pub dropped: Vec<DroppedChangeset>,
}

impl ReleasePlan {
    /// Changeset files incorporated into some update.
    #[must_use]
    pub fn consumed_paths(&self) -> Vec<PathBuf> {
        self.updates
            .iter()
            .flat_map(|update| update.changesets.iter().map(|c| c.path.clone()))
            .collect()
    }
}

/// Resolves the next version of every package with changesets. Nothing is
/// written; any invalid version or policy violation fails the whole plan.
///
/// # Errors
///
/// Returns [`OperationError::InvalidVersion`] when a package's current
/// version does not parse and [`OperationError::Resolve`] when resolution
/// rejects its changesets.
pub fn plan_release(
    packages: &[Package],
    mut classification: Classification,
    mode: ResolutionMode,
) -> Result<ReleasePlan> {
    let mut updates = Vec::new();

    for package in packages {
        let Some(changesets) = classification.packages.shift_remove(&package.name) else {
            continue;
        };

        let current = Semver::parse(&package.version).map_err(|source| {
            OperationError::InvalidVersion {
                package: package.name.clone(),
                version: package.version.clone(),
                source,
            }
        })?;

        let resolved = match mode {
            ResolutionMode::Stage(stage) => resolve_for_stage(&current, &changesets, stage),
            ResolutionMode::Branch(branch) => resolve_for_branch(&current, &changesets, branch),
        };

        let next_version = match resolved {
            Ok(version) => version,
            Err(VersionError::MissingChangesets) => continue,
            Err(source) => {
                return Err(OperationError::Resolve {
                    package: package.name.clone(),
                    source,
                });
            }
        };

        debug!(package = %package.name, %current, next = %next_version, "planned release");
        updates.push(ReleaseUpdate {
            package: package.clone(),
            changesets,
            next_version,
        });
    }

    Ok(ReleasePlan {
        updates,
        dropped: classification.dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockVersionControl, make_package, make_raw};
    use crate::operations::classify::classify;
    use cadence_core::ChangeType;
    use cadence_project::{ProjectConfig, ReleaseConfig};

    fn project(flow: ReleaseFlow) -> Project {
        Project {
            root: PathBuf::from("/repo"),
            config: ProjectConfig::default().with_flow(flow),
            release: ReleaseConfig::default(),
        }
    }

    #[test]
    fn widgets_minor_and_patch_resolve_to_next_minor() -> anyhow::Result<()> {
        let packages = vec![make_package("widgets", "1.2.0")];
        let raw = vec![
            make_raw("a", "widgets", "minor", "add feature"),
            make_raw("b", "widgets", "patch", "fix bug"),
        ];

        let plan = plan_release(
            &packages,
            classify(&raw, &packages),
            ResolutionMode::Stage(None),
        )?;

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].next_version.to_string(), "1.3.0");
        assert_eq!(plan.updates[0].changesets.get(ChangeType::Minor).len(), 1);
        assert_eq!(
            plan.consumed_paths(),
            [
                PathBuf::from(".changeset/a.md"),
                PathBuf::from(".changeset/b.md")
            ]
        );
        Ok(())
    }

    #[test]
    fn packages_without_changesets_are_not_planned() -> anyhow::Result<()> {
        let packages = vec![make_package("gadgets", "0.1.0"), make_package("widgets", "2.3.1")];
        let raw = vec![make_raw("a", "widgets", "major", "break things")];

        let plan = plan_release(
            &packages,
            classify(&raw, &packages),
            ResolutionMode::Stage(Some(TargetStage::Stable)),
        )?;

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].package.name, "widgets");
        assert_eq!(plan.updates[0].next_version.to_string(), "3.0.0");
        Ok(())
    }

    #[test]
    fn next_changeset_on_stable_fails_the_plan() {
        let packages = vec![make_package("gadgets", "0.1.0"), make_package("widgets", "1.0.0")];
        let raw = vec![
            make_raw("a", "gadgets", "patch", "fine"),
            make_raw("b", "widgets", "next", "prerelease only"),
        ];

        let result = plan_release(&packages, classify(&raw, &packages), ResolutionMode::Stage(None));

        assert!(matches!(
            result,
            Err(OperationError::Resolve {
                ref package,
                source: VersionError::InvalidChangesetForStage { .. }
            }) if package == "widgets"
        ));
    }

    #[test]
    fn unparseable_current_version_is_fatal() {
        let packages = vec![make_package("widgets", "1.0")];
        let raw = vec![make_raw("a", "widgets", "patch", "fix")];

        let result = plan_release(&packages, classify(&raw, &packages), ResolutionMode::Stage(None));

        assert!(matches!(result, Err(OperationError::InvalidVersion { .. })));
    }

    #[test]
    fn branch_mode_opens_prerelease_line() -> anyhow::Result<()> {
        let packages = vec![make_package("widgets", "2.4.1")];
        let raw = vec![make_raw("a", "widgets", "next", "new api")];

        let plan = plan_release(
            &packages,
            classify(&raw, &packages),
            ResolutionMode::Branch(ReleaseBranch::Major(3)),
        )?;

        assert_eq!(plan.updates[0].next_version.to_string(), "3.0.0-next.0");
        Ok(())
    }

    #[test]
    fn dropped_changesets_are_reported() -> anyhow::Result<()> {
        let packages = vec![make_package("widgets", "1.0.0")];
        let raw = vec![
            make_raw("a", "widgets", "patch", "fix"),
            make_raw("b", "sprockets", "patch", "elsewhere"),
        ];

        let plan = plan_release(&packages, classify(&raw, &packages), ResolutionMode::Stage(None))?;

        assert_eq!(plan.dropped.len(), 1);
        assert_eq!(plan.dropped[0].id, "b");
        assert_eq!(plan.consumed_paths(), [PathBuf::from(".changeset/a.md")]);
        Ok(())
    }

    #[test]
    fn stage_flow_targets_base_branch() -> anyhow::Result<()> {
        let vcs = MockVersionControl::on_branch("feature/x");

        let target = release_target(&project(ReleaseFlow::Stage), None, &vcs)?.expect("stage flow always releases");

        assert_eq!(target.mode, ResolutionMode::Stage(None));
        assert_eq!(target.base_branch, "main");
        Ok(())
    }

    #[test]
    fn branch_flow_uses_current_branch() -> anyhow::Result<()> {
        let vcs = MockVersionControl::on_branch("v3");

        let target = release_target(&project(ReleaseFlow::Branch), None, &vcs)?.expect("v3 releases");

        assert_eq!(target.mode, ResolutionMode::Branch(ReleaseBranch::Major(3)));
        assert_eq!(target.base_branch, "v3");
        Ok(())
    }

    #[test]
    fn branch_flow_skips_unknown_branch() -> anyhow::Result<()> {
        let vcs = MockVersionControl::on_branch("main");

        let target = release_target(&project(ReleaseFlow::Branch), Some("feature/x"), &vcs)?;

        assert!(target.is_none());
        Ok(())
    }
}
