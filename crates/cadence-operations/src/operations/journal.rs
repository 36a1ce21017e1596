use tracing::{debug, warn};

use crate::Result;
use crate::error::OperationError;

type Undo<'a> = Box<dyn FnOnce() -> Result<()> + 'a>;

/// Undo log for the file writes of one release run.
///
/// Each successful write records how to revert it. On failure the recorded
/// steps run in reverse order (LIFO).
#[derive(Default)]
pub struct WriteJournal<'a> {
    entries: Vec<(String, Undo<'a>)>,
}

impl<'a> WriteJournal<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, description: impl Into<String>, undo: impl FnOnce() -> Result<()> + 'a) {
        self.entries.push((description.into(), Box::new(undo)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reverts every recorded write and wraps `cause` in the resulting error.
    ///
    /// Every undo step is attempted even if an earlier one fails.
    #[must_use]
    pub fn rollback(self, cause: OperationError) -> OperationError {
        warn!(steps = self.entries.len(), error = %cause, "rolling back release writes");

        let mut failures = Vec::new();
        for (description, undo) in self.entries.into_iter().rev() {
            match undo() {
                Ok(()) => debug!(%description, "reverted"),
                Err(e) => {
                    warn!(%description, error = %e, "revert failed");
                    failures.push(format!("{description}: {e}"));
                }
            }
        }

        if failures.is_empty() {
            OperationError::RolledBack(Box::new(cause))
        } else {
            OperationError::Rollback {
                failures,
                cause: Box::new(cause),
            }
        }
    }

    /// Keeps the writes; the undo steps are discarded.
    pub fn commit(self) {
        debug!(steps = self.entries.len(), "release writes committed");
    }
}
