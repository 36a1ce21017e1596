use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub sha: String,
    /// Forge login of the commit author, when the commit is linked to an account.
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub number: u64,
    pub author: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDraft {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub prerelease: bool,
    pub make_latest: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Account {
    pub(crate) login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitResponse {
    pub(crate) sha: String,
    pub(crate) author: Option<Account>,
}

impl From<CommitResponse> for CommitRef {
    fn from(commit: CommitResponse) -> Self {
        Self {
            sha: commit.sha,
            author: commit.author.map(|a| a.login),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestResponse {
    pub(crate) number: u64,
    pub(crate) user: Option<Account>,
    pub(crate) html_url: String,
}

impl From<PullRequestResponse> for PullRequestRef {
    fn from(pr: PullRequestResponse) -> Self {
        Self {
            number: pr.number,
            author: pr.user.map(|u| u.login),
            url: pr.html_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PullRequestPatch<'a> {
    pub(crate) title: &'a str,
    pub(crate) body: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReleaseRequest<'a> {
    pub(crate) tag_name: &'a str,
    pub(crate) name: &'a str,
    pub(crate) body: &'a str,
    pub(crate) prerelease: bool,
    /// GitHub expects the strings `"true"` / `"false"` here.
    pub(crate) make_latest: &'static str,
}

impl<'a> From<&'a ReleaseDraft> for ReleaseRequest<'a> {
    fn from(draft: &'a ReleaseDraft) -> Self {
        Self {
            tag_name: &draft.tag_name,
            name: &draft.name,
            body: &draft.body,
            prerelease: draft.prerelease,
            make_latest: if draft.make_latest { "true" } else { "false" },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReleaseResponse {
    pub(crate) html_url: String,
}
