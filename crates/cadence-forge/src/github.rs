use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use tracing::debug;
use url::Url;

use crate::http::{client, decode, ensure_success, execute, join_segments, parse_base};
use crate::types::{
    CommitResponse, PullRequestPatch, PullRequestResponse, ReleaseRequest, ReleaseResponse,
};
use crate::{CommitRef, PullRequestDraft, PullRequestRef, ReleaseDraft, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Blocking client for the GitHub REST endpoints a release run needs,
/// scoped to one repository.
pub struct GitHubClient {
    http: Client,
    api_base: Url,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GitHubClient {
    /// # Errors
    ///
    /// Returns an error if `api_base` is not a valid base URL or the HTTP
    /// client cannot be built.
    pub fn new(
        api_base: &str,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            http: client()?,
            api_base: parse_base(api_base)?,
            owner: owner.into(),
            repo: repo.into(),
            token,
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Most recent commit touching `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the forge answers non-2xx.
    pub fn latest_commit_for_path(&self, path: &str) -> Result<Option<CommitRef>> {
        let mut url = self.repo_url(&["commits"])?;
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("per_page", "1");

        let (target, body) = self.get(url)?;
        latest_commit(&target, &body)
    }

    /// Pull request associated with a commit. When several are, the most
    /// recently opened one wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the forge answers non-2xx.
    pub fn pull_request_for_commit(&self, sha: &str) -> Result<Option<PullRequestRef>> {
        let url = self.repo_url(&["commits", sha, "pulls"])?;
        let (target, body) = self.get(url)?;
        most_recent_pull_request(&target, &body)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the pull request does not exist.
    pub fn pull_request(&self, number: u64) -> Result<PullRequestRef> {
        let url = self.repo_url(&["pulls", &number.to_string()])?;
        let (target, body) = self.get(url)?;
        decode::<PullRequestResponse>(&target, &body).map(PullRequestRef::from)
    }

    /// Open pull request from `head` (a branch of this repository) into `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the forge answers non-2xx.
    pub fn find_open_pull_request(&self, head: &str, base: &str) -> Result<Option<PullRequestRef>> {
        let mut url = self.repo_url(&["pulls"])?;
        url.query_pairs_mut()
            .append_pair("state", "open")
            .append_pair("head", &format!("{}:{head}", self.owner))
            .append_pair("base", base);

        let (target, body) = self.get(url)?;
        let pulls: Vec<PullRequestResponse> = decode(&target, &body)?;
        Ok(pulls.into_iter().next().map(PullRequestRef::from))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the forge answers non-2xx.
    pub fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequestRef> {
        let url = self.repo_url(&["pulls"])?;
        let target = format!("POST {url}");
        let request = self.authorize(self.http.post(url)).json(draft);
        let body = self.send(request, &target)?;
        decode::<PullRequestResponse>(&target, &body).map(PullRequestRef::from)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the forge answers non-2xx.
    pub fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<PullRequestRef> {
        let url = self.repo_url(&["pulls", &number.to_string()])?;
        let target = format!("PATCH {url}");
        let request = self
            .authorize(self.http.patch(url))
            .json(&PullRequestPatch { title, body });
        let response = self.send(request, &target)?;
        decode::<PullRequestResponse>(&target, &response).map(PullRequestRef::from)
    }

    /// Creates a release for an existing tag and returns its page URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the forge answers non-2xx.
    pub fn create_release(&self, draft: &ReleaseDraft) -> Result<String> {
        let url = self.repo_url(&["releases"])?;
        let target = format!("POST {url}");
        let request = self
            .authorize(self.http.post(url))
            .json(&ReleaseRequest::from(draft));
        let body = self.send(request, &target)?;
        decode::<ReleaseResponse>(&target, &body).map(|r| r.html_url)
    }

    fn repo_url(&self, segments: &[&str]) -> Result<Url> {
        join_segments(
            &self.api_base,
            ["repos", self.owner.as_str(), self.repo.as_str()]
                .into_iter()
                .chain(segments.iter().copied()),
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header(ACCEPT, MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get(&self, url: Url) -> Result<(String, String)> {
        let target = format!("GET {url}");
        let request = self.authorize(self.http.get(url));
        let body = self.send(request, &target)?;
        Ok((target, body))
    }

    fn send(&self, request: RequestBuilder, target: &str) -> Result<String> {
        debug!(%target, "forge request");
        let (status, body) = execute(request, target)?;
        ensure_success(target, status, &body)?;
        Ok(body)
    }
}

fn latest_commit(target: &str, body: &str) -> Result<Option<CommitRef>> {
    let commits: Vec<CommitResponse> = decode(target, body)?;
    Ok(commits.into_iter().next().map(CommitRef::from))
}

fn most_recent_pull_request(target: &str, body: &str) -> Result<Option<PullRequestRef>> {
    let pulls: Vec<PullRequestResponse> = decode(target, body)?;
    Ok(pulls
        .into_iter()
        .max_by_key(|pr| pr.number)
        .map(PullRequestRef::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ForgeError;

    #[test]
    fn repo_url_is_scoped_to_repository() {
        let client = GitHubClient::new(DEFAULT_API_URL, "acme", "widgets", None).expect("client");

        let url = client.repo_url(&["commits", "abc123", "pulls"]).expect("url");

        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/acme/widgets/commits/abc123/pulls"
        );
        assert_eq!(client.owner(), "acme");
        assert_eq!(client.repo(), "widgets");
    }

    #[test]
    fn latest_commit_takes_first_entry() {
        let body = r#"[
            {"sha": "aaa", "author": {"login": "alice"}},
            {"sha": "bbb", "author": {"login": "bob"}}
        ]"#;

        let commit = latest_commit("GET commits", body).expect("decodes");

        assert_eq!(
            commit,
            Some(CommitRef {
                sha: "aaa".to_string(),
                author: Some("alice".to_string())
            })
        );
    }

    #[test]
    fn commit_without_linked_account_has_no_author() {
        let body = r#"[{"sha": "aaa", "author": null}]"#;

        let commit = latest_commit("GET commits", body).expect("decodes").expect("one commit");

        assert_eq!(commit.author, None);
    }

    #[test]
    fn no_commits_is_none() {
        assert_eq!(latest_commit("GET commits", "[]").expect("decodes"), None);
    }

    #[test]
    fn most_recent_pull_request_wins() {
        let body = r#"[
            {"number": 12, "user": {"login": "alice"}, "html_url": "https://github.com/acme/widgets/pull/12"},
            {"number": 40, "user": {"login": "bob"}, "html_url": "https://github.com/acme/widgets/pull/40"}
        ]"#;

        let pr = most_recent_pull_request("GET pulls", body)
            .expect("decodes")
            .expect("one pr");

        assert_eq!(pr.number, 40);
        assert_eq!(pr.author.as_deref(), Some("bob"));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let result = most_recent_pull_request("GET pulls", r#"{"message": "oops"}"#);

        assert!(matches!(result, Err(ForgeError::Decode { .. })));
    }

    #[test]
    fn release_request_serializes_make_latest_as_string() {
        let draft = ReleaseDraft {
            tag_name: "widgets@1.3.0".to_string(),
            name: "widgets@1.3.0".to_string(),
            body: "notes".to_string(),
            prerelease: false,
            make_latest: true,
        };

        let json = serde_json::to_value(ReleaseRequest::from(&draft)).expect("serializes");

        assert_eq!(json["make_latest"], "true");
        assert_eq!(json["prerelease"], false);
        assert_eq!(json["tag_name"], "widgets@1.3.0");
    }
}
