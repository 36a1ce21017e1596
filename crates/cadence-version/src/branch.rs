use std::fmt;

use crate::parse_integer;

/// Long-lived branches that drive the branch release flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseBranch {
    /// `main` or `master`.
    Main,
    /// A `vN` maintenance or prerelease line.
    Major(u64),
}

impl ReleaseBranch {
    /// Returns `None` for branches that do not take part in releases.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "main" | "master" => Some(Self::Main),
            other => {
                let major = parse_integer(other.strip_prefix('v')?).ok()?;
                (major > 0).then_some(Self::Major(major))
            }
        }
    }
}

impl fmt::Display for ReleaseBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::Major(major) => write!(f, "v{major}"),
        }
    }
}
