use cadence_core::BumpType;

use crate::{Result, Semver, VersionError};

/// Bumps the stable components of `version`; any prerelease suffix is dropped.
///
/// # Errors
///
/// Returns [`VersionError::Overflow`] if the bumped component does not fit
/// in a `u64`.
pub fn bump_version(version: &Semver, bump_type: BumpType) -> Result<Semver> {
    Ok(match bump_type {
        BumpType::Major => Semver::new(increment(version.major, version)?, 0, 0),
        BumpType::Minor => Semver::new(version.major, increment(version.minor, version)?, 0),
        BumpType::Patch => Semver::new(
            version.major,
            version.minor,
            increment(version.patch, version)?,
        ),
    })
}

pub(crate) fn increment(component: u64, version: &Semver) -> Result<u64> {
    component
        .checked_add(1)
        .ok_or_else(|| VersionError::Overflow {
            version: version.to_string(),
        })
}
