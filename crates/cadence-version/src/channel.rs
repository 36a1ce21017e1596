use std::fmt;

use crate::Semver;

/// Registry distribution channel a published version lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseChannel {
    Latest,
    Next,
    Legacy,
}

impl ReleaseChannel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Next => "next",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prereleases go to `next`; a stable version behind an already published
/// higher major goes to `legacy`; everything else is `latest`.
#[must_use]
pub fn release_channel(current: &Semver, published: &[Semver]) -> ReleaseChannel {
    if current.is_prerelease() {
        return ReleaseChannel::Next;
    }

    let newer_major_published = published
        .iter()
        .any(|version| !version.is_prerelease() && version.major > current.major);

    if newer_major_published {
        ReleaseChannel::Legacy
    } else {
        ReleaseChannel::Latest
    }
}
