use url::Url;

use crate::error::ChangelogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    GitHub,
    GitLab,
    Bitbucket,
    Gitea,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub forge: Forge,
    pub owner: String,
    pub repo: String,
    pub base_url: Url,
}

impl RepositoryInfo {
    /// Accepts `https://host/owner/repo[.git]` and `git@host:owner/repo.git`.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::UrlParse` if the URL is invalid or
    /// `ChangelogError::InvalidRepositoryPath` if it lacks owner/repo segments.
    pub fn from_url(url_str: &str) -> Result<Self, ChangelogError> {
        let normalized = normalize_scp_url(url_str.trim());
        let url = Url::parse(&normalized).map_err(|source| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source,
        })?;

        let host = url.host_str().ok_or_else(|| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source: url::ParseError::EmptyHost,
        })?;

        let forge = detect_forge(host);
        let (owner, repo) = extract_owner_repo(&url)?;

        let base_url = Url::parse(&format!("https://{host}")).map_err(|source| {
            ChangelogError::UrlParse {
                url: url_str.to_string(),
                source,
            }
        })?;

        Ok(Self {
            forge,
            owner,
            repo,
            base_url,
        })
    }

    #[must_use]
    pub fn pull_request_url(&self, number: u64) -> String {
        match self.forge {
            Forge::GitHub => format!(
                "{}{}/{}/pull/{number}",
                self.base_url, self.owner, self.repo
            ),
            Forge::GitLab => format!(
                "{}{}/{}/-/merge_requests/{number}",
                self.base_url, self.owner, self.repo
            ),
            Forge::Bitbucket => format!(
                "{}{}/{}/pull-requests/{number}",
                self.base_url, self.owner, self.repo
            ),
            Forge::Gitea => format!(
                "{}{}/{}/pulls/{number}",
                self.base_url, self.owner, self.repo
            ),
        }
    }

    #[must_use]
    pub fn user_url(&self, login: &str) -> String {
        format!("{}{login}", self.base_url)
    }
}

fn normalize_scp_url(url: &str) -> String {
    if url.contains("://") {
        return url.to_string();
    }
    match url.split_once('@').and_then(|(_, rest)| rest.split_once(':')) {
        Some((host, path)) => format!("https://{host}/{path}"),
        None => url.to_string(),
    }
}

fn detect_forge(host: &str) -> Forge {
    let host_lower = host.to_lowercase();

    if host_lower == "gitlab.com"
        || host_lower.starts_with("gitlab.")
        || host_lower.contains(".gitlab.")
    {
        Forge::GitLab
    } else if host_lower == "bitbucket.org" || host_lower.ends_with(".bitbucket.org") {
        Forge::Bitbucket
    } else if host_lower == "codeberg.org" || host_lower.starts_with("gitea.") {
        Forge::Gitea
    } else {
        Forge::GitHub
    }
}

fn extract_owner_repo(url: &Url) -> Result<(String, String), ChangelogError> {
    let path = url.path().trim_start_matches('/').trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let [owner, repo, ..] = segments.as_slice() else {
        return Err(ChangelogError::InvalidRepositoryPath {
            url: url.to_string(),
        });
    };

    Ok(((*owner).to_string(), (*repo).to_string()))
}
