use std::fmt;
use std::path::PathBuf;

use cadence_core::{Package, PackageChangesets};
use cadence_version::Semver;

/// Planned version change for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseUpdate {
    pub package: Package,
    pub changesets: PackageChangesets,
    pub next_version: Semver,
}

/// A pending changeset the classifier could not assign to a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedChangeset {
    pub id: String,
    pub path: PathBuf,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    UnknownType(String),
    MissingPackage,
    UnknownPackage(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(token) => write!(f, "unknown change type '{token}'"),
            Self::MissingPackage => f.write_str("no package named"),
            Self::UnknownPackage(name) => write!(f, "unknown package '{name}'"),
        }
    }
}
