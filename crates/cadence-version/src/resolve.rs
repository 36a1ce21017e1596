//! Next-version resolution for one package.
//!
//! Two flows exist. The stage flow runs on the default branch and consults
//! the configured target stage. The branch flow derives the release line
//! from a `main`/`vN` branch name.
//!
//! | current      | stage           | result                          |
//! |--------------|-----------------|---------------------------------|
//! | stable       | unset or stable | stable bump                     |
//! | stable       | beta            | stable bump with `-next.0`      |
//! | `-next.N`    | stable          | `major.minor.0`                 |
//! | `-next.N`    | unset or beta   | `-next.(N+1)`                   |

use cadence_core::{BumpType, ChangeType, PackageChangesets, TargetStage};
use tracing::debug;

use crate::bump::increment;
use crate::{ReleaseBranch, Result, Semver, VersionError, bump_version};

/// # Errors
///
/// Returns [`VersionError::MissingChangesets`] when `changes` is empty,
/// [`VersionError::InvalidChangesetForStage`] when a stable bump would have
/// to consume `next` changesets and [`VersionError::Overflow`] when a
/// component cannot be incremented.
pub fn resolve_for_stage(
    current: &Semver,
    changes: &PackageChangesets,
    stage: Option<TargetStage>,
) -> Result<Semver> {
    if changes.is_empty() {
        return Err(VersionError::MissingChangesets);
    }

    let next = match (current.prerelease, stage) {
        (None, None | Some(TargetStage::Stable)) => stable_bump(current, changes)?,
        (None, Some(TargetStage::Beta)) => {
            bump_version(current, prerelease_severity(changes))?.with_prerelease(0)
        }
        (Some(_), Some(TargetStage::Stable)) => Semver::new(current.major, current.minor, 0),
        (Some(counter), None | Some(TargetStage::Beta)) => {
            current.with_prerelease(increment(counter, current)?)
        }
    };

    debug!(%current, %next, ?stage, "resolved version for stage");
    Ok(next)
}

/// # Errors
///
/// Returns [`VersionError::MissingChangesets`] when `changes` is empty,
/// [`VersionError::InvalidChangesetForStage`] when a stable bump would consume
/// `next` changesets, [`VersionError::InvalidBranchVersion`] when the branch
/// major is behind the current major, and
/// [`VersionError::MajorBumpOnReleaseLine`] when a stable `vN` line would
/// leave its major.
pub fn resolve_for_branch(
    current: &Semver,
    changes: &PackageChangesets,
    branch: ReleaseBranch,
) -> Result<Semver> {
    if changes.is_empty() {
        return Err(VersionError::MissingChangesets);
    }

    let next = match branch {
        ReleaseBranch::Main => {
            if current.is_prerelease() {
                Semver::new(current.major, 0, 0)
            } else {
                stable_bump(current, changes)?
            }
        }
        ReleaseBranch::Major(branch_major) if branch_major > current.major => {
            Semver::new(branch_major, 0, 0).with_prerelease(0)
        }
        ReleaseBranch::Major(branch_major) if branch_major < current.major => {
            return Err(VersionError::InvalidBranchVersion {
                branch_major,
                current: current.to_string(),
            });
        }
        ReleaseBranch::Major(branch_major) => match current.prerelease {
            Some(counter) => current.with_prerelease(increment(counter, current)?),
            None => {
                let majors = ids(changes, ChangeType::Major);
                if !majors.is_empty() {
                    return Err(VersionError::MajorBumpOnReleaseLine {
                        branch_major,
                        changesets: majors,
                    });
                }
                stable_bump(current, changes)?
            }
        },
    };

    debug!(%current, %next, %branch, "resolved version for branch");
    Ok(next)
}

fn stable_bump(current: &Semver, changes: &PackageChangesets) -> Result<Semver> {
    if changes.has_next() {
        return Err(VersionError::InvalidChangesetForStage {
            version: current.to_string(),
            changesets: ids(changes, ChangeType::Next),
        });
    }

    let bump = changes
        .highest_bump()
        .ok_or(VersionError::MissingChangesets)?;
    bump_version(current, bump)
}

/// Severity used when a stable version opens a prerelease line. `next`
/// changesets announce a new major.
fn prerelease_severity(changes: &PackageChangesets) -> BumpType {
    if changes.has_next() {
        BumpType::Major
    } else {
        changes.highest_bump().unwrap_or(BumpType::Patch)
    }
}

fn ids(changes: &PackageChangesets, change_type: ChangeType) -> Vec<String> {
    changes
        .get(change_type)
        .iter()
        .map(|changeset| changeset.id.clone())
        .collect()
}
