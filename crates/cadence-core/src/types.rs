use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Patch => "Patch",
            Self::Minor => "Minor",
            Self::Major => "Major",
        };
        write!(f, "{s}")
    }
}

/// The kind of change a changeset declares.
///
/// `Next` marks a change that belongs to a prerelease line; it never maps to a
/// stable version component.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Patch,
    Minor,
    Major,
    Next,
}

impl ChangeType {
    pub const ALL: [Self; 4] = [Self::Major, Self::Minor, Self::Patch, Self::Next];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Next => "next",
        }
    }

    #[must_use]
    pub fn bump_type(self) -> Option<BumpType> {
        match self {
            Self::Patch => Some(BumpType::Patch),
            Self::Minor => Some(BumpType::Minor),
            Self::Major => Some(BumpType::Major),
            Self::Next => None,
        }
    }

    /// Subsection title used in generated release notes.
    #[must_use]
    pub fn section_title(self) -> &'static str {
        match self {
            Self::Patch => "Patch changes",
            Self::Minor => "Minor changes",
            Self::Major => "Major changes",
            Self::Next => "Next changes",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            "next" => Ok(Self::Next),
            other => Err(CoreError::UnknownChangeType {
                token: other.to_string(),
            }),
        }
    }
}

/// Stage a release run should move packages towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetStage {
    Stable,
    Beta,
}

impl FromStr for TargetStage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(Self::Stable),
            "beta" | "next" => Ok(Self::Beta),
            other => Err(CoreError::UnknownTargetStage {
                token: other.to_string(),
            }),
        }
    }
}

/// Who authored a change and through which pull request it landed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub author: Option<String>,
    pub pull_request: Option<u64>,
}

impl Attribution {
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.author.is_none() && self.pull_request.is_none()
    }
}

/// A changeset file as read from disk, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChangeset {
    pub id: String,
    /// Path relative to the project root.
    pub path: PathBuf,
    pub type_text: String,
    pub package: Option<String>,
    pub body: String,
    pub pull_request: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset {
    pub id: String,
    pub change_type: ChangeType,
    pub package: String,
    pub content: String,
    pub path: PathBuf,
    pub attribution: Attribution,
}

/// Changesets of one package, bucketed by change type.
///
/// Each bucket keeps insertion order so generated changelogs are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageChangesets {
    major: Vec<Changeset>,
    minor: Vec<Changeset>,
    patch: Vec<Changeset>,
    next: Vec<Changeset>,
}

impl PackageChangesets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, changeset: Changeset) {
        self.bucket_mut(changeset.change_type).push(changeset);
    }

    #[must_use]
    pub fn get(&self, change_type: ChangeType) -> &[Changeset] {
        match change_type {
            ChangeType::Major => &self.major,
            ChangeType::Minor => &self.minor,
            ChangeType::Patch => &self.patch,
            ChangeType::Next => &self.next,
        }
    }

    fn bucket_mut(&mut self, change_type: ChangeType) -> &mut Vec<Changeset> {
        match change_type {
            ChangeType::Major => &mut self.major,
            ChangeType::Minor => &mut self.minor,
            ChangeType::Patch => &mut self.patch,
            ChangeType::Next => &mut self.next,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.major.len() + self.minor.len() + self.patch.len() + self.next.len()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.next.is_empty()
    }

    /// Highest stable severity present, ignoring `next` changesets.
    #[must_use]
    pub fn highest_bump(&self) -> Option<BumpType> {
        if !self.major.is_empty() {
            Some(BumpType::Major)
        } else if !self.minor.is_empty() {
            Some(BumpType::Minor)
        } else if !self.patch.is_empty() {
            Some(BumpType::Patch)
        } else {
            None
        }
    }

    /// Non-empty buckets in changelog emission order.
    pub fn sections(&self) -> impl Iterator<Item = (ChangeType, &[Changeset])> {
        ChangeType::ALL
            .into_iter()
            .map(|change_type| (change_type, self.get(change_type)))
            .filter(|(_, changesets)| !changesets.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Changeset> {
        self.sections().flat_map(|(_, changesets)| changesets.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Changeset> {
        self.major
            .iter_mut()
            .chain(self.minor.iter_mut())
            .chain(self.patch.iter_mut())
            .chain(self.next.iter_mut())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    PackageJson,
    CargoToml,
}

impl ManifestKind {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::PackageJson => "package.json",
            Self::CargoToml => "Cargo.toml",
        }
    }

    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "package.json" => Some(Self::PackageJson),
            "Cargo.toml" => Some(Self::CargoToml),
            _ => None,
        }
    }
}

/// A package discovered by scanning the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Version text as written in the manifest, not yet validated.
    pub version: String,
    /// Manifest path relative to the project root.
    pub manifest_path: PathBuf,
    /// Package directory relative to the project root.
    pub directory: PathBuf,
    pub kind: ManifestKind,
    pub private: bool,
    pub raw_manifest: String,
}
