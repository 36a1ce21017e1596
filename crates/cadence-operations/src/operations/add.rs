use std::path::PathBuf;

use cadence_core::ChangeType;
use cadence_parse::ChangesetDraft;
use tracing::info;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{ChangesetStore, ManifestStore};

#[derive(Debug, Clone)]
pub struct AddInput {
    pub package: String,
    pub change_type: ChangeType,
    pub pull_request: Option<u64>,
    pub description: String,
}

pub struct AddOperation<S, M> {
    changesets: S,
    manifests: M,
}

impl<S, M> AddOperation<S, M>
where
    S: ChangesetStore,
    M: ManifestStore,
{
    pub fn new(changesets: S, manifests: M) -> Self {
        Self {
            changesets,
            manifests,
        }
    }

    /// Writes a new changeset and returns its path relative to the project
    /// root.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::UnknownPackage`] if no discovered package has
    /// the given name, [`OperationError::EmptyDescription`] for a blank
    /// description, or an error if the file cannot be written.
    pub fn execute(&self, input: AddInput) -> Result<PathBuf> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(OperationError::EmptyDescription);
        }

        let packages = self.manifests.scan_packages()?;
        if !packages.iter().any(|p| p.name == input.package) {
            let available = packages
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(OperationError::UnknownPackage {
                name: input.package,
                available,
            });
        }

        let draft = ChangesetDraft {
            package: input.package,
            change_type: input.change_type,
            pull_request: input.pull_request,
            body: description.to_string(),
        };
        let path = self.changesets.create(&draft)?;
        info!(path = %path.display(), package = %draft.package, "created changeset");
        Ok(path)
    }
}
