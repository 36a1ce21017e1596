use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::error::ProjectError;

const DEFAULT_IGNORES: [&str; 3] = [".git", "node_modules", "target"];

/// Paths excluded from package discovery, matched against root-relative
/// paths.
///
/// Patterns use a subset of gitignore syntax: `#` comments, blank lines,
/// anchored patterns (leading `/` or an inner `/`), directory patterns
/// (trailing `/`, matching directories only) and unanchored names.
/// Negations are not supported.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    set: GlobSet,
    dirs: GlobSet,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>()).unwrap_or_else(|_| Self {
            set: GlobSet::empty(),
            dirs: GlobSet::empty(),
        })
    }
}

impl IgnoreRules {
    /// Builds rules from the built-in defaults plus `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::GlobPattern`] if a pattern cannot be compiled.
    pub fn new<I, S>(patterns: I) -> Result<Self, ProjectError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut dirs = GlobSetBuilder::new();

        let defaults = DEFAULT_IGNORES.iter().map(|p| (*p).to_string());
        let extra = patterns.into_iter().map(|p| p.as_ref().to_string());

        for line in defaults.chain(extra) {
            for (glob, dir_only) in expand_pattern(&line) {
                let compiled = GlobBuilder::new(&glob)
                    .literal_separator(true)
                    .build()
                    .map_err(|source| ProjectError::GlobPattern {
                        pattern: line.clone(),
                        source,
                    })?;
                if dir_only {
                    dirs.add(compiled);
                } else {
                    builder.add(compiled);
                }
            }
        }

        let combined = |source| ProjectError::GlobPattern {
            pattern: "<combined>".to_string(),
            source,
        };
        let set = builder.build().map_err(combined)?;
        let dirs = dirs.build().map_err(combined)?;

        Ok(Self { set, dirs })
    }

    /// Builds rules from `.gitignore` content and extra configured patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::GlobPattern`] if a pattern cannot be compiled.
    pub fn from_gitignore(gitignore: Option<&str>, extra: &[String]) -> Result<Self, ProjectError> {
        let lines = gitignore.unwrap_or_default().lines().map(str::to_string);
        Self::new(lines.chain(extra.iter().cloned()))
    }

    #[must_use]
    pub fn is_ignored(&self, relative_path: &Path, is_dir: bool) -> bool {
        self.set.is_match(relative_path) || (is_dir && self.dirs.is_match(relative_path))
    }
}

/// Translates one gitignore-style line into globs over root-relative paths,
/// each flagged when it may only match a directory.
fn expand_pattern(line: &str) -> Vec<(String, bool)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Vec::new();
    }
    if line.starts_with('!') {
        debug!(pattern = line, "negated ignore patterns are not supported, skipping");
        return Vec::new();
    }

    let pattern = line.trim_end_matches('/');
    let dir_only = pattern.len() != line.len();
    if pattern.is_empty() {
        return Vec::new();
    }

    let anchored = pattern.starts_with('/') || pattern.contains('/');
    let pattern = pattern.trim_start_matches('/');

    let pattern = if anchored {
        pattern.to_string()
    } else {
        format!("**/{pattern}")
    };
    if pattern.ends_with("**") {
        vec![(pattern, false)]
    } else {
        vec![(format!("{pattern}/**"), false), (pattern, dir_only)]
    }
}
