use cadence_forge::{CommitRef, GitHubClient, PullRequestDraft, PullRequestRef, ReleaseDraft};

use crate::Result;
use crate::traits::ForgeClient;

pub struct GitHubForge {
    client: GitHubClient,
}

impl GitHubForge {
    #[must_use]
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

impl ForgeClient for GitHubForge {
    fn find_commit_for_file(&self, path: &str) -> Result<Option<CommitRef>> {
        Ok(self.client.latest_commit_for_path(path)?)
    }

    fn find_pull_request_for_commit(&self, sha: &str) -> Result<Option<PullRequestRef>> {
        Ok(self.client.pull_request_for_commit(sha)?)
    }

    fn find_pull_request_by_number(&self, number: u64) -> Result<PullRequestRef> {
        Ok(self.client.pull_request(number)?)
    }

    fn find_open_pull_request(&self, head: &str, base: &str) -> Result<Option<PullRequestRef>> {
        Ok(self.client.find_open_pull_request(head, base)?)
    }

    fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequestRef> {
        Ok(self.client.create_pull_request(draft)?)
    }

    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<PullRequestRef> {
        Ok(self.client.update_pull_request(number, title, body)?)
    }

    fn create_release(&self, draft: &ReleaseDraft) -> Result<String> {
        Ok(self.client.create_release(draft)?)
    }
}
