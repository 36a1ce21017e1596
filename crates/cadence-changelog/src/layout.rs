use tracing::debug;

use crate::{ChangelogError, Result};

const DEFAULT_VERSION_LEVEL: u8 = 2;

/// Heading conventions of a package changelog.
///
/// The file is a `#` title followed by one section per version. Version
/// headings are recognized by exact prefix match at the configured level;
/// nothing else in the file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangelogLayout {
    version_level: u8,
}

impl Default for ChangelogLayout {
    fn default() -> Self {
        Self {
            version_level: DEFAULT_VERSION_LEVEL,
        }
    }
}

impl ChangelogLayout {
    /// # Errors
    ///
    /// Returns [`ChangelogError::InvalidHeadingLevel`] unless `2 <= level <= 5`.
    pub fn new(version_level: u8) -> Result<Self> {
        if !(2..=5).contains(&version_level) {
            return Err(ChangelogError::InvalidHeadingLevel {
                level: version_level,
            });
        }
        Ok(Self { version_level })
    }

    #[must_use]
    pub fn version_level(&self) -> u8 {
        self.version_level
    }

    fn heading_prefix(&self) -> String {
        format!("{} ", "#".repeat(usize::from(self.version_level)))
    }

    #[must_use]
    pub fn version_heading(&self, version: &str) -> String {
        format!("{}{version}", self.heading_prefix())
    }

    /// Rewrites `existing` so it starts with the title and the section for
    /// `version`, followed by every earlier version section untouched.
    ///
    /// Content between the title and the first earlier version heading is
    /// dropped: it is either a stale title or a partial section for
    /// `version` written by a previous run. Running this again with the same
    /// arguments over its own output returns the output unchanged.
    #[must_use]
    pub fn reconcile(
        &self,
        existing: Option<&str>,
        title: &str,
        version: &str,
        section_body: &str,
    ) -> String {
        let existing = existing.unwrap_or_default();
        let prefix = self.heading_prefix();
        let target = self.version_heading(version);

        let items: Vec<(usize, &str)> = non_empty_lines(existing).collect();
        let target_index = items.iter().position(|(_, line)| *line == target);
        let search_from = target_index.map_or(0, |index| index + 1);

        let boundary = items[search_from..]
            .iter()
            .find(|(_, line)| line.starts_with(&prefix))
            .map(|(offset, _)| *offset);

        debug!(
            %version,
            regenerating = target_index.is_some(),
            preserved_bytes = boundary.map_or(0, |offset| existing.len() - offset),
            "reconciling changelog"
        );

        let mut output = format!("# {title}\n\n{target}\n");

        let body = section_body.trim();
        if !body.is_empty() {
            output.push('\n');
            output.push_str(body);
            output.push('\n');
        }

        if let Some(offset) = boundary {
            let previous = existing[offset..].trim_end();
            output.push('\n');
            output.push_str(previous);
            output.push('\n');
        }

        output
    }

    /// Body of the section for `version`, without its heading.
    #[must_use]
    pub fn extract_section(&self, text: &str, version: &str) -> Option<String> {
        let prefix = self.heading_prefix();
        let target = self.version_heading(version);

        let mut lines = lines_with_offsets(text);
        let (start, heading) = lines.find(|(_, line)| line.trim_end() == target)?;
        let body_start = start + heading.len();

        let body_end = lines
            .find(|(_, line)| line.starts_with(&prefix))
            .map_or(text.len(), |(offset, _)| offset);

        Some(text[body_start..body_end].trim().to_string())
    }
}

/// Lines with their byte offsets; each line keeps its terminator.
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

fn non_empty_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    lines_with_offsets(text)
        .map(|(offset, line)| (offset, line.trim_end()))
        .filter(|(_, line)| !line.is_empty())
}
