use cadence_core::RawChangeset;
use cadence_project::Project;

use super::classify::classify;
use super::plan::{ReleasePlan, plan_release, release_target};
use crate::Result;
use crate::traits::{ChangesetStore, ManifestStore, VersionControl};

#[derive(Debug)]
pub struct StatusOutput {
    pub pending: Vec<RawChangeset>,
    /// `None` when the current branch does not take part in releases.
    pub plan: Option<ReleasePlan>,
}

/// Runs the planning phase of `prepare` without touching any file.
pub struct StatusOperation<S, M, V> {
    changesets: S,
    manifests: M,
    vcs: V,
}

impl<S, M, V> StatusOperation<S, M, V>
where
    S: ChangesetStore,
    M: ManifestStore,
    V: VersionControl,
{
    pub fn new(changesets: S, manifests: M, vcs: V) -> Self {
        Self {
            changesets,
            manifests,
            vcs,
        }
    }

    /// # Errors
    ///
    /// Returns the same validation and policy errors `prepare` would.
    pub fn execute(&self, project: &Project, branch: Option<&str>) -> Result<StatusOutput> {
        let pending = self.changesets.list_pending()?;
        if pending.is_empty() {
            return Ok(StatusOutput {
                pending,
                plan: Some(ReleasePlan::default()),
            });
        }

        let Some(target) = release_target(project, branch, &self.vcs)? else {
            return Ok(StatusOutput {
                pending,
                plan: None,
            });
        };

        let packages = self.manifests.scan_packages()?;
        let classification = classify(&pending, &packages);
        let plan = plan_release(&packages, classification, target.mode)?;

        Ok(StatusOutput {
            pending,
            plan: Some(plan),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use cadence_project::{ProjectConfig, ReleaseConfig, ReleaseFlow};

    use super::*;
    use crate::mocks::{MockChangesetStore, MockManifestStore, MockVersionControl, make_package, make_raw};

    fn project(flow: ReleaseFlow) -> Project {
        Project {
            root: PathBuf::from("/repo"),
            config: ProjectConfig::default().with_flow(flow),
            release: ReleaseConfig::default(),
        }
    }

    fn manifests() -> MockManifestStore {
        MockManifestStore::new()
            .with_package(make_package("gadgets", "0.4.0"))
            .with_package(make_package("widgets", "1.2.0"))
    }

    #[test]
    fn empty_when_no_changesets() {
        let operation = StatusOperation::new(
            MockChangesetStore::new(),
            manifests(),
            MockVersionControl::on_branch("main"),
        );

        let output = operation
            .execute(&project(ReleaseFlow::Stage), None)
            .expect("status should succeed");

        assert!(output.pending.is_empty());
        assert!(output.plan.expect("plan").updates.is_empty());
    }

    #[test]
    fn projects_versions_and_reports_dropped() {
        let changesets = MockChangesetStore::new()
            .with_changeset(make_raw("a", "widgets", "minor", "feature"))
            .with_changeset(make_raw("b", "widgets", "patch", "fix"))
            .with_changeset(make_raw("c", "widgets", "chore", "tidy"));
        let operation = StatusOperation::new(
            changesets.clone(),
            manifests(),
            MockVersionControl::on_branch("main"),
        );

        let output = operation
            .execute(&project(ReleaseFlow::Stage), None)
            .expect("status should succeed");

        assert_eq!(output.pending.len(), 3);
        let plan = output.plan.expect("plan");
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].package.name, "widgets");
        assert_eq!(plan.updates[0].next_version.to_string(), "1.3.0");
        assert_eq!(plan.dropped.len(), 1);
        assert!(changesets.deleted().is_empty());
    }

    #[test]
    fn unknown_branch_has_no_plan() {
        let operation = StatusOperation::new(
            MockChangesetStore::new().with_changeset(make_raw("a", "widgets", "minor", "feature")),
            manifests(),
            MockVersionControl::on_branch("main"),
        );

        let output = operation
            .execute(&project(ReleaseFlow::Branch), Some("feature/login"))
            .expect("status should succeed");

        assert_eq!(output.pending.len(), 1);
        assert!(output.plan.is_none());
    }
}
