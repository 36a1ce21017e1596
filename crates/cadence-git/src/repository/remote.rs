use git2::{Cred, CredentialType, PushOptions, RemoteCallbacks};
use tracing::{debug, info};

use crate::{GitError, PushAuth, Result};

use super::{REMOTE_NAME, Repository};

const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;
const TOKEN_USERNAME: &str = "x-access-token";

impl Repository {
    /// # Errors
    ///
    /// Returns an error if the remote lookup fails.
    pub fn remote_url(&self) -> Result<Option<String>> {
        let Ok(remote) = self.inner.find_remote(REMOTE_NAME) else {
            return Ok(None);
        };

        Ok(remote.url().map(String::from))
    }

    /// Force-pushes a local branch to the branch of the same name on `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote is missing or refuses the update.
    pub fn push_branch(&self, name: &str, auth: &PushAuth) -> Result<()> {
        let refspec = format!("+refs/heads/{name}:refs/heads/{name}");
        self.push(&[refspec], auth)?;
        info!(branch = name, "pushed branch");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the remote is missing or refuses any tag.
    pub fn push_tags(&self, names: &[String], auth: &PushAuth) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }

        let refspecs: Vec<String> = names
            .iter()
            .map(|name| format!("refs/tags/{name}:refs/tags/{name}"))
            .collect();
        self.push(&refspecs, auth)?;
        info!(count = names.len(), "pushed tags");
        Ok(())
    }

    fn push(&self, refspecs: &[String], auth: &PushAuth) -> Result<()> {
        let mut remote =
            self.inner
                .find_remote(REMOTE_NAME)
                .map_err(|_| GitError::RemoteNotFound {
                    name: REMOTE_NAME.to_string(),
                })?;

        let mut rejected: Option<(String, String)> = None;
        let mut attempts = 0;

        {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.credentials(|url, username_from_url, allowed| {
                attempts += 1;
                if attempts > MAX_CREDENTIAL_ATTEMPTS {
                    return Err(git2::Error::from_str("authentication failed"));
                }
                credentials(auth, url, username_from_url, allowed)
            });
            callbacks.push_update_reference(|reference, status| {
                if let Some(message) = status {
                    rejected.get_or_insert_with(|| (reference.to_string(), message.to_string()));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);

            debug!(?refspecs, "pushing to {REMOTE_NAME}");
            remote.push(refspecs, Some(&mut options))?;
        }

        if let Some((reference, message)) = rejected {
            return Err(GitError::PushRejected { reference, message });
        }

        Ok(())
    }
}

fn credentials(
    auth: &PushAuth,
    url: &str,
    username_from_url: Option<&str>,
    allowed: CredentialType,
) -> std::result::Result<Cred, git2::Error> {
    match auth {
        PushAuth::Token(token) if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) => {
            Cred::userpass_plaintext(TOKEN_USERNAME, token)
        }
        _ if allowed.contains(CredentialType::SSH_KEY) => {
            Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
        }
        _ if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) => {
            let config = git2::Config::open_default()?;
            Cred::credential_helper(&config, url, username_from_url)
        }
        _ => Cred::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::tests::setup_test_repo;
    use std::fs;
    use tempfile::TempDir;

    fn add_bare_remote(repo: &Repository) -> anyhow::Result<(TempDir, git2::Repository)> {
        let remote_dir = TempDir::new()?;
        let bare = git2::Repository::init_bare(remote_dir.path())?;
        let url = remote_dir
            .path()
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-UTF-8 temp path"))?
            .to_string();
        repo.inner.remote(REMOTE_NAME, &url)?;
        Ok((remote_dir, bare))
    }

    #[test]
    fn remote_url_returns_none_when_no_remote() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        assert!(repo.remote_url()?.is_none());
        Ok(())
    }

    #[test]
    fn remote_url_returns_url_when_present() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        repo.inner.remote("origin", "git@github.com:acme/widgets.git")?;

        let repository = Repository::open(dir.path())?;

        assert_eq!(
            repository.remote_url()?.as_deref(),
            Some("git@github.com:acme/widgets.git")
        );
        Ok(())
    }

    #[test]
    fn push_without_remote_is_an_error() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        let result = repo.push_branch("main", &PushAuth::Ambient);

        assert!(matches!(result, Err(GitError::RemoteNotFound { .. })));
        Ok(())
    }

    #[test]
    fn push_branch_force_updates_remote() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        let (_remote_dir, bare) = add_bare_remote(&repo)?;

        repo.checkout_new_branch("changeset-release/main")?;
        fs::write(dir.path().join("a.txt"), "first")?;
        repo.commit_all("first release")?;
        repo.push_branch("changeset-release/main", &PushAuth::Ambient)?;

        let base = repo.inner.head()?.peel_to_commit()?.parent_id(0)?;
        repo.inner
            .reference("refs/heads/changeset-release/main", base, true, "rewind")?;
        fs::write(dir.path().join("a.txt"), "second")?;
        let second = repo.commit_all("second release")?;
        repo.push_branch("changeset-release/main", &PushAuth::Ambient)?;

        let remote_tip = bare
            .find_reference("refs/heads/changeset-release/main")?
            .peel_to_commit()?;
        assert_eq!(remote_tip.id().to_string(), second.sha);
        assert_eq!(remote_tip.message(), Some("second release"));
        Ok(())
    }

    #[test]
    fn push_tags_sends_each_tag() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let (_remote_dir, bare) = add_bare_remote(&repo)?;

        repo.create_tag("widgets@1.3.0", "widgets@1.3.0")?;
        repo.create_tag("gadgets@0.5.0", "gadgets@0.5.0")?;
        repo.push_tags(
            &["widgets@1.3.0".to_string(), "gadgets@0.5.0".to_string()],
            &PushAuth::Ambient,
        )?;

        assert!(bare.find_reference("refs/tags/widgets@1.3.0").is_ok());
        assert!(bare.find_reference("refs/tags/gadgets@0.5.0").is_ok());
        Ok(())
    }

    #[test]
    fn push_tags_with_nothing_is_a_no_op() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        repo.push_tags(&[], &PushAuth::Ambient)?;
        Ok(())
    }
}
