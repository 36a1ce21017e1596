use serde::Serialize;

use cadence_core::ChangeType;

use crate::error::{FormatError, ValidationError};
use crate::parse::FRONT_MATTER_DELIMITER;

/// Contents of a changeset about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesetDraft {
    pub package: String,
    pub change_type: ChangeType,
    pub pull_request: Option<u64>,
    pub body: String,
}

#[derive(Serialize)]
struct FrontMatterOutput<'a> {
    package: &'a str,
    #[serde(rename = "type")]
    change_type: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pr: Option<u64>,
}

/// # Errors
///
/// Returns [`FormatError`] when the draft names no package or YAML
/// serialization fails.
#[must_use = "serialization result should be handled"]
pub fn serialize_changeset(draft: &ChangesetDraft) -> Result<String, FormatError> {
    if draft.package.trim().is_empty() {
        return Err(ValidationError::EmptyPackage.into());
    }
    if draft.pull_request == Some(0) {
        return Err(ValidationError::InvalidPullRequest.into());
    }

    let front_matter = FrontMatterOutput {
        package: &draft.package,
        change_type: draft.change_type,
        pr: draft.pull_request,
    };

    let yaml = serde_yml::to_string(&front_matter)?;

    let mut output = String::new();
    output.push_str(FRONT_MATTER_DELIMITER);
    output.push('\n');
    output.push_str(&yaml);
    output.push_str(FRONT_MATTER_DELIMITER);
    output.push('\n');

    let body = draft.body.trim();
    if !body.is_empty() {
        output.push('\n');
        output.push_str(body);
        output.push('\n');
    }

    Ok(output)
}
