use cadence_forge::{CommitRef, PullRequestDraft, PullRequestRef, ReleaseDraft};

use crate::Result;

/// Code-hosting calls. Implementations must be shareable across threads:
/// attribution lookups run in parallel.
pub trait ForgeClient: Send + Sync {
    /// Latest commit touching `path` (relative to the repository root).
    ///
    /// # Errors
    ///
    /// Returns an error if the forge call fails.
    fn find_commit_for_file(&self, path: &str) -> Result<Option<CommitRef>>;

    /// # Errors
    ///
    /// Returns an error if the forge call fails.
    fn find_pull_request_for_commit(&self, sha: &str) -> Result<Option<PullRequestRef>>;

    /// # Errors
    ///
    /// Returns an error if the forge call fails or the pull request does not exist.
    fn find_pull_request_by_number(&self, number: u64) -> Result<PullRequestRef>;

    /// # Errors
    ///
    /// Returns an error if the forge call fails.
    fn find_open_pull_request(&self, head: &str, base: &str) -> Result<Option<PullRequestRef>>;

    /// # Errors
    ///
    /// Returns an error if the forge call fails.
    fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequestRef>;

    /// # Errors
    ///
    /// Returns an error if the forge call fails.
    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<PullRequestRef>;

    /// Returns the URL of the created release.
    ///
    /// # Errors
    ///
    /// Returns an error if the forge call fails.
    fn create_release(&self, draft: &ReleaseDraft) -> Result<String>;
}
