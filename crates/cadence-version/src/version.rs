use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Result, VersionError};

const PRERELEASE_TAG: &str = "next";

/// Parses a non-negative integer written without sign, leading zeros, or
/// any non-digit character. A lone `"0"` is accepted.
///
/// # Errors
///
/// Returns [`VersionError::InvalidInteger`] for any other input, including
/// values that overflow `u64`.
pub fn parse_integer(text: &str) -> Result<u64> {
    let invalid = || VersionError::InvalidInteger {
        input: text.to_string(),
    };

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if text.len() > 1 && text.starts_with('0') {
        return Err(invalid());
    }

    text.parse::<u64>().map_err(|_| invalid())
}

/// A version on either a stable line (`1.2.3`) or a prerelease line
/// (`1.2.3-next.4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Semver {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<u64>,
}

impl Semver {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// # Errors
    ///
    /// Returns [`VersionError::InvalidVersionFormat`] unless `text` is exactly
    /// `D.D.D` or `D.D.D-next.D` with strict integers.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || VersionError::InvalidVersionFormat {
            input: text.to_string(),
        };

        let (core, suffix) = match text.split_once('-') {
            Some((core, suffix)) => (core, Some(suffix)),
            None => (text, None),
        };

        let mut parts = core.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let prerelease = match suffix {
            None => None,
            Some(suffix) => {
                let counter = suffix
                    .strip_prefix(PRERELEASE_TAG)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .ok_or_else(invalid)?;
                Some(parse_integer(counter).map_err(|_| invalid())?)
            }
        };

        Ok(Self {
            major: parse_integer(major).map_err(|_| invalid())?,
            minor: parse_integer(minor).map_err(|_| invalid())?,
            patch: parse_integer(patch).map_err(|_| invalid())?,
            prerelease,
        })
    }

    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    #[must_use]
    pub fn with_prerelease(self, counter: u64) -> Self {
        Self {
            prerelease: Some(counter),
            ..self
        }
    }

    /// Same version with the prerelease suffix removed.
    #[must_use]
    pub fn stable(self) -> Self {
        Self {
            prerelease: None,
            ..self
        }
    }
}

impl fmt::Display for Semver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(counter) = self.prerelease {
            write!(f, "-{PRERELEASE_TAG}.{counter}")?;
        }
        Ok(())
    }
}

impl FromStr for Semver {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for Semver {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.prerelease, other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(&b),
            })
    }
}

impl PartialOrd for Semver {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
