use std::path::Path;

use serde::Deserialize;

use cadence_core::RawChangeset;

use crate::error::{FormatError, FrontMatterError, ValidationError};

pub(crate) const FRONT_MATTER_DELIMITER: &str = "---";

pub const CHANGESET_EXTENSION: &str = "md";

const MAX_INPUT_SIZE: usize = 1024 * 1024;

const IGNORED_FILE_NAMES: [&str; 1] = ["README.md"];

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    #[serde(rename = "type")]
    change_type: String,
    #[serde(default)]
    package: Option<String>,
    #[serde(default)]
    pr: Option<u64>,
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

fn find_closing_delimiter(content: &str) -> Option<usize> {
    if content.starts_with(FRONT_MATTER_DELIMITER) {
        return Some(0);
    }
    if let Some(pos) = content.find("\r\n---") {
        return Some(pos + 2);
    }
    if let Some(pos) = content.find("\n---") {
        return Some(pos + 1);
    }
    None
}

fn extract_front_matter(content: &str) -> Result<(&str, &str), FormatError> {
    let trimmed = content.trim_start();

    let Some(after_opening) = trimmed.strip_prefix(FRONT_MATTER_DELIMITER) else {
        return Err(FrontMatterError::MissingOpeningDelimiter.into());
    };
    let after_opening = strip_line_ending(after_opening);

    let Some(closing_pos) = find_closing_delimiter(after_opening) else {
        return Err(FrontMatterError::MissingClosingDelimiter.into());
    };

    let yaml_content = after_opening[..closing_pos].trim_end_matches('\r');
    if yaml_content.trim().is_empty() {
        return Err(FrontMatterError::EmptyFrontMatter.into());
    }

    let after_closing = &after_opening[closing_pos + FRONT_MATTER_DELIMITER.len()..];
    let body = strip_line_ending(after_closing);

    Ok((yaml_content, body))
}

/// Whether a directory entry should be treated as a pending changeset.
#[must_use]
pub fn is_changeset_file(path: &Path) -> bool {
    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext == CHANGESET_EXTENSION);
    let is_ignored = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| IGNORED_FILE_NAMES.contains(&name));

    is_markdown && !is_ignored
}

/// Derives the changeset id from a `<id>.md` filename.
///
/// Ids are restricted to ASCII alphanumerics, `-` and `_`, so a name such as
/// `fix.minor.md` is rejected instead of being read as two different ids.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidFilename`] when the filename does not
/// resolve to exactly one id.
pub fn changeset_id(path: &Path) -> Result<String, FormatError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let invalid = |reason| ValidationError::InvalidFilename {
        file_name: file_name.to_string(),
        reason,
    };

    let Some(id) = file_name.strip_suffix(".md") else {
        return Err(invalid("expected a '.md' extension").into());
    };
    if id.is_empty() {
        return Err(invalid("id must not be empty").into());
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid("id may only contain ASCII letters, digits, '-' and '_'").into());
    }

    Ok(id.to_string())
}

/// Parses a changeset file. `path` is kept on the record as given.
///
/// The `type` value is returned verbatim; recognizing it is left to the
/// classifier so unknown types can be skipped instead of failing the run.
///
/// # Errors
///
/// Returns [`FormatError`] when the filename, front matter, or YAML is
/// malformed.
#[must_use = "parsing result should be handled"]
pub fn parse_changeset(path: &Path, content: &str) -> Result<RawChangeset, FormatError> {
    if content.len() > MAX_INPUT_SIZE {
        return Err(ValidationError::InputTooLarge {
            max_bytes: MAX_INPUT_SIZE,
        }
        .into());
    }

    let id = changeset_id(path)?;
    let (yaml_content, body) = extract_front_matter(content)?;
    let front_matter: FrontMatter = serde_yml::from_str(yaml_content)?;

    let type_text = front_matter.change_type.trim().to_string();
    if type_text.is_empty() {
        return Err(ValidationError::EmptyType.into());
    }

    let package = match front_matter.package {
        Some(name) if name.trim().is_empty() => return Err(ValidationError::EmptyPackage.into()),
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };

    if front_matter.pr == Some(0) {
        return Err(ValidationError::InvalidPullRequest.into());
    }

    Ok(RawChangeset {
        id,
        path: path.to_path_buf(),
        type_text,
        package,
        body: body.trim().to_string(),
        pull_request: front_matter.pr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(file_name: &str, content: &str) -> Result<RawChangeset, FormatError> {
        parse_changeset(&Path::new(".changeset").join(file_name), content)
    }

    #[test]
    fn full_front_matter() {
        let content = "---\npackage: widgets\ntype: minor\npr: 42\n---\n\nAdd the frobnicator.\n";

        let changeset = parse("brave-red-fox.md", content).expect("should parse");

        assert_eq!(changeset.id, "brave-red-fox");
        assert_eq!(changeset.path, Path::new(".changeset/brave-red-fox.md"));
        assert_eq!(changeset.type_text, "minor");
        assert_eq!(changeset.package.as_deref(), Some("widgets"));
        assert_eq!(changeset.pull_request, Some(42));
        assert_eq!(changeset.body, "Add the frobnicator.");
    }

    #[test]
    fn package_and_pr_are_optional() {
        let content = "---\ntype: patch\n---\nFix a bug\n";

        let changeset = parse("fix.md", content).expect("should parse");

        assert_eq!(changeset.package, None);
        assert_eq!(changeset.pull_request, None);
    }

    #[test]
    fn unknown_type_text_is_kept_verbatim() {
        let content = "---\npackage: widgets\ntype: feature\n---\nSomething\n";

        let changeset = parse("x.md", content).expect("unknown types are classified later");

        assert_eq!(changeset.type_text, "feature");
    }

    #[test]
    fn multiline_body_is_trimmed() {
        let content = "---\ntype: minor\n---\n\nFirst paragraph.\n\n- one\n- two\n\n";

        let changeset = parse("multi.md", content).expect("should parse");

        assert_eq!(changeset.body, "First paragraph.\n\n- one\n- two");
    }

    #[test]
    fn delimiter_inside_body() {
        let content = "---\ntype: patch\n---\nSummary with --- inside text.\n";

        let changeset = parse("x.md", content).expect("should parse");

        assert!(changeset.body.contains("---"));
    }

    #[test]
    fn windows_line_endings() {
        let content = "---\r\npackage: widgets\r\ntype: patch\r\n---\r\nWindows style.\r\n";

        let changeset = parse("win.md", content).expect("should parse");

        assert_eq!(changeset.package.as_deref(), Some("widgets"));
        assert_eq!(changeset.type_text, "patch");
        assert_eq!(changeset.body, "Windows style.");
    }

    #[test]
    fn error_missing_opening_delimiter() {
        let result = parse("x.md", "type: patch\n---\nBody\n");

        assert!(matches!(
            result,
            Err(FormatError::FrontMatter(
                FrontMatterError::MissingOpeningDelimiter
            ))
        ));
    }

    #[test]
    fn error_missing_closing_delimiter() {
        let result = parse("x.md", "---\ntype: patch\nBody\n");

        assert!(matches!(
            result,
            Err(FormatError::FrontMatter(
                FrontMatterError::MissingClosingDelimiter
            ))
        ));
    }

    #[test]
    fn error_empty_front_matter() {
        let result = parse("x.md", "---\n---\nBody\n");

        assert!(matches!(
            result,
            Err(FormatError::FrontMatter(FrontMatterError::EmptyFrontMatter))
        ));
    }

    #[test]
    fn error_missing_type() {
        let result = parse("x.md", "---\npackage: widgets\n---\nBody\n");

        assert!(matches!(result, Err(FormatError::Yaml(_))));
    }

    #[test]
    fn error_unknown_key() {
        let result = parse("x.md", "---\ntype: patch\nbump: minor\n---\nBody\n");

        assert!(matches!(result, Err(FormatError::Yaml(_))));
    }

    #[test]
    fn error_empty_type() {
        let result = parse("x.md", "---\ntype: \"  \"\n---\nBody\n");

        assert!(matches!(
            result,
            Err(FormatError::Validation(ValidationError::EmptyType))
        ));
    }

    #[test]
    fn error_zero_pull_request() {
        let result = parse("x.md", "---\ntype: patch\npr: 0\n---\nBody\n");

        assert!(matches!(
            result,
            Err(FormatError::Validation(ValidationError::InvalidPullRequest))
        ));
    }

    #[test]
    fn error_input_too_large() {
        let content = format!("---\ntype: patch\n---\n{}", "a".repeat(MAX_INPUT_SIZE));

        let result = parse("x.md", &content);

        assert!(matches!(
            result,
            Err(FormatError::Validation(ValidationError::InputTooLarge { .. }))
        ));
    }

    #[test]
    fn filename_with_extra_dots_is_rejected() {
        let result = parse("fix.minor.md", "---\ntype: minor\n---\nBody\n");

        assert!(matches!(
            result,
            Err(FormatError::Validation(ValidationError::InvalidFilename { .. }))
        ));
    }

    #[test]
    fn changeset_id_rules() {
        assert_eq!(
            changeset_id(Path::new("a1_b-2.md")).expect("valid id"),
            "a1_b-2"
        );
        assert!(changeset_id(Path::new(".md")).is_err());
        assert!(changeset_id(Path::new("notes.txt")).is_err());
        assert!(changeset_id(Path::new("has space.md")).is_err());
        assert!(changeset_id(Path::new("$abc.md")).is_err());
    }

    #[test]
    fn readme_and_non_markdown_are_not_changesets() {
        assert!(is_changeset_file(Path::new(".changeset/fix.md")));
        assert!(!is_changeset_file(Path::new(".changeset/README.md")));
        assert!(!is_changeset_file(Path::new(".changeset/config.toml")));
    }
}
