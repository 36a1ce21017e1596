use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cadence_core::{ManifestKind, Package, RawChangeset};
use cadence_forge::{CommitRef, ForgeError, PullRequestDraft, PullRequestRef, ReleaseDraft};
use cadence_git::{CommitInfo, TagInfo};
use cadence_parse::ChangesetDraft;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ChangelogStore, ChangesetStore, CommandRunner, ForgeClient, ManifestStore, RegistryClient,
    VersionControl,
};

fn io_failure(path: &Path) -> std::io::Error {
    std::io::Error::other(format!("simulated failure for {}", path.display()))
}

pub(crate) fn make_raw(id: &str, package: &str, type_text: &str, body: &str) -> RawChangeset {
    RawChangeset {
        id: id.to_string(),
        path: PathBuf::from(format!(".changeset/{id}.md")),
        type_text: type_text.to_string(),
        package: Some(package.to_string()),
        body: body.to_string(),
        pull_request: None,
    }
}

pub(crate) fn make_package(name: &str, version: &str) -> Package {
    let directory = PathBuf::from("packages").join(name);
    Package {
        name: name.to_string(),
        version: version.to_string(),
        manifest_path: directory.join("package.json"),
        directory,
        kind: ManifestKind::PackageJson,
        private: false,
        raw_manifest: format!(r#"{{"name": "{name}", "version": "{version}"}}"#),
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockChangesetStore {
    pending: Arc<Mutex<Vec<RawChangeset>>>,
    deleted: Arc<Mutex<Vec<PathBuf>>>,
    restored: Arc<Mutex<Vec<PathBuf>>>,
    created: Arc<Mutex<Vec<ChangesetDraft>>>,
    fail_delete_on: Option<PathBuf>,
}

impl MockChangesetStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_changeset(self, changeset: RawChangeset) -> Self {
        self.pending.lock().expect("lock").push(changeset);
        self
    }

    pub(crate) fn failing_delete_on(mut self, path: &str) -> Self {
        self.fail_delete_on = Some(PathBuf::from(path));
        self
    }

    pub(crate) fn deleted(&self) -> Vec<PathBuf> {
        self.deleted.lock().expect("lock").clone()
    }

    pub(crate) fn restored(&self) -> Vec<PathBuf> {
        self.restored.lock().expect("lock").clone()
    }

    pub(crate) fn created(&self) -> Vec<ChangesetDraft> {
        self.created.lock().expect("lock").clone()
    }
}

impl ChangesetStore for MockChangesetStore {
    fn list_pending(&self) -> Result<Vec<RawChangeset>> {
        let deleted = self.deleted.lock().expect("lock");
        Ok(self
            .pending
            .lock()
            .expect("lock")
            .iter()
            .filter(|c| !deleted.contains(&c.path))
            .cloned()
            .collect())
    }

    fn read_source(&self, path: &Path) -> Result<String> {
        Ok(format!("source of {}", path.display()))
    }

    fn delete(&self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            if self.fail_delete_on.as_ref() == Some(path) {
                return Err(OperationError::ChangesetDelete {
                    path: path.clone(),
                    source: io_failure(path),
                });
            }
            self.deleted.lock().expect("lock").push(path.clone());
        }
        Ok(())
    }

    fn restore(&self, path: &Path, _content: &str) -> Result<()> {
        self.deleted.lock().expect("lock").retain(|p| p != path);
        self.restored.lock().expect("lock").push(path.to_path_buf());
        Ok(())
    }

    fn create(&self, draft: &ChangesetDraft) -> Result<PathBuf> {
        self.created.lock().expect("lock").push(draft.clone());
        Ok(PathBuf::from(".changeset/mock-changeset-id.md"))
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockManifestStore {
    packages: Vec<Package>,
    written: Arc<Mutex<HashMap<String, String>>>,
    fail_on: Option<String>,
}

impl MockManifestStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }

    pub(crate) fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    pub(crate) fn written(&self) -> HashMap<String, String> {
        self.written.lock().expect("lock").clone()
    }
}

impl ManifestStore for MockManifestStore {
    fn scan_packages(&self) -> Result<Vec<Package>> {
        Ok(self.packages.clone())
    }

    fn render_version(&self, package: &Package, version: &str) -> Result<String> {
        Ok(format!(
            r#"{{"name": "{}", "version": "{version}"}}"#,
            package.name
        ))
    }

    fn write_manifest(&self, package: &Package, content: &str) -> Result<()> {
        if self.fail_on.as_deref() == Some(package.name.as_str()) {
            return Err(cadence_manifest::ManifestError::Write {
                path: package.manifest_path.clone(),
                source: io_failure(&package.manifest_path),
            }
            .into());
        }
        self.written
            .lock()
            .expect("lock")
            .insert(package.name.clone(), content.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockChangelogStore {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MockChangelogStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_changelog(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .lock()
            .expect("lock")
            .insert(path.into(), content.to_string());
        self
    }

    pub(crate) fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().expect("lock").get(path.as_ref()).cloned()
    }
}

impl ChangelogStore for MockChangelogStore {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.get(path))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.files.lock().expect("lock").remove(path);
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct MockVersionControl {
    branch: String,
    checkouts: Arc<Mutex<Vec<String>>>,
    commits: Arc<Mutex<Vec<String>>>,
    pushed_branches: Arc<Mutex<Vec<String>>>,
    tags: Arc<Mutex<Vec<String>>>,
    pushed_tags: Arc<Mutex<Vec<String>>>,
}

impl MockVersionControl {
    pub(crate) fn on_branch(branch: &str) -> Self {
        Self {
            branch: branch.to_string(),
            checkouts: Arc::default(),
            commits: Arc::default(),
            pushed_branches: Arc::default(),
            tags: Arc::default(),
            pushed_tags: Arc::default(),
        }
    }

    pub(crate) fn checkouts(&self) -> Vec<String> {
        self.checkouts.lock().expect("lock").clone()
    }

    pub(crate) fn commits(&self) -> Vec<String> {
        self.commits.lock().expect("lock").clone()
    }

    pub(crate) fn pushed_branches(&self) -> Vec<String> {
        self.pushed_branches.lock().expect("lock").clone()
    }

    pub(crate) fn tags(&self) -> Vec<String> {
        self.tags.lock().expect("lock").clone()
    }

    pub(crate) fn pushed_tags(&self) -> Vec<String> {
        self.pushed_tags.lock().expect("lock").clone()
    }
}

impl VersionControl for MockVersionControl {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn checkout_new_branch(&self, name: &str) -> Result<()> {
        self.checkouts.lock().expect("lock").push(name.to_string());
        Ok(())
    }

    fn commit_all(&self, message: &str) -> Result<CommitInfo> {
        self.commits.lock().expect("lock").push(message.to_string());
        Ok(CommitInfo {
            sha: "0000000000000000000000000000000000000001".to_string(),
            message: message.to_string(),
        })
    }

    fn push_branch(&self, name: &str) -> Result<()> {
        self.pushed_branches
            .lock()
            .expect("lock")
            .push(name.to_string());
        Ok(())
    }

    fn create_tag(&self, name: &str, _message: &str) -> Result<TagInfo> {
        self.tags.lock().expect("lock").push(name.to_string());
        Ok(TagInfo {
            name: name.to_string(),
            target_sha: "0000000000000000000000000000000000000001".to_string(),
        })
    }

    fn push_tags(&self, names: &[String]) -> Result<()> {
        self.pushed_tags.lock().expect("lock").extend_from_slice(names);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockForge {
    commits: HashMap<String, CommitRef>,
    commit_pulls: HashMap<String, PullRequestRef>,
    pulls: HashMap<u64, PullRequestRef>,
    failing_paths: HashSet<String>,
    open_pull_request: Option<PullRequestRef>,
    created: Arc<Mutex<Vec<PullRequestDraft>>>,
    updated: Arc<Mutex<Vec<(u64, String, String)>>>,
    releases: Arc<Mutex<Vec<ReleaseDraft>>>,
}

pub(crate) fn pull_request(number: u64, author: &str) -> PullRequestRef {
    PullRequestRef {
        number,
        author: Some(author.to_string()),
        url: format!("https://github.com/acme/widgets/pull/{number}"),
    }
}

impl MockForge {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_commit(mut self, path: &str, sha: &str, author: &str) -> Self {
        self.commits.insert(
            path.to_string(),
            CommitRef {
                sha: sha.to_string(),
                author: Some(author.to_string()),
            },
        );
        self
    }

    pub(crate) fn with_commit_pull_request(mut self, sha: &str, pr: PullRequestRef) -> Self {
        self.commit_pulls.insert(sha.to_string(), pr);
        self
    }

    pub(crate) fn with_pull_request(mut self, pr: PullRequestRef) -> Self {
        self.pulls.insert(pr.number, pr);
        self
    }

    pub(crate) fn failing_for_path(mut self, path: &str) -> Self {
        self.failing_paths.insert(path.to_string());
        self
    }

    pub(crate) fn with_open_pull_request(mut self, pr: PullRequestRef) -> Self {
        self.open_pull_request = Some(pr);
        self
    }

    pub(crate) fn created(&self) -> Vec<PullRequestDraft> {
        self.created.lock().expect("lock").clone()
    }

    pub(crate) fn updated(&self) -> Vec<(u64, String, String)> {
        self.updated.lock().expect("lock").clone()
    }

    pub(crate) fn releases(&self) -> Vec<ReleaseDraft> {
        self.releases.lock().expect("lock").clone()
    }
}

fn not_found(target: String) -> OperationError {
    ForgeError::Status {
        target,
        status: 404,
        message: "Not Found".to_string(),
    }
    .into()
}

impl ForgeClient for MockForge {
    fn find_commit_for_file(&self, path: &str) -> Result<Option<CommitRef>> {
        if self.failing_paths.contains(path) {
            return Err(ForgeError::Status {
                target: format!("GET commits?path={path}"),
                status: 500,
                message: "Server Error".to_string(),
            }
            .into());
        }
        Ok(self.commits.get(path).cloned())
    }

    fn find_pull_request_for_commit(&self, sha: &str) -> Result<Option<PullRequestRef>> {
        Ok(self.commit_pulls.get(sha).cloned())
    }

    fn find_pull_request_by_number(&self, number: u64) -> Result<PullRequestRef> {
        self.pulls
            .get(&number)
            .cloned()
            .ok_or_else(|| not_found(format!("GET pulls/{number}")))
    }

    fn find_open_pull_request(&self, _head: &str, _base: &str) -> Result<Option<PullRequestRef>> {
        Ok(self.open_pull_request.clone())
    }

    fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequestRef> {
        self.created.lock().expect("lock").push(draft.clone());
        Ok(pull_request(99, "cadence-bot"))
    }

    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<PullRequestRef> {
        self.updated
            .lock()
            .expect("lock")
            .push((number, title.to_string(), body.to_string()));
        Ok(pull_request(number, "cadence-bot"))
    }

    fn create_release(&self, draft: &ReleaseDraft) -> Result<String> {
        self.releases.lock().expect("lock").push(draft.clone());
        Ok(format!(
            "https://github.com/acme/widgets/releases/tag/{}",
            draft.tag_name
        ))
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockRegistry {
    versions: HashMap<String, Vec<String>>,
}

impl MockRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_versions(mut self, name: &str, versions: &[&str]) -> Self {
        self.versions.insert(
            name.to_string(),
            versions.iter().map(ToString::to_string).collect(),
        );
        self
    }
}

impl RegistryClient for MockRegistry {
    fn published_versions(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.versions.get(name).cloned().unwrap_or_default())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockCommandRunner {
    runs: Arc<Mutex<Vec<(String, PathBuf, Vec<(String, String)>)>>>,
    fail_on: Option<String>,
}

impl MockCommandRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_on(mut self, command: &str) -> Self {
        self.fail_on = Some(command.to_string());
        self
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.runs
            .lock()
            .expect("lock")
            .iter()
            .map(|(command, _, _)| command.clone())
            .collect()
    }

    pub(crate) fn runs(&self) -> Vec<(String, PathBuf, Vec<(String, String)>)> {
        self.runs.lock().expect("lock").clone()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, command: &str, cwd: &Path, env: &[(String, String)]) -> Result<()> {
        self.runs
            .lock()
            .expect("lock")
            .push((command.to_string(), cwd.to_path_buf(), env.to_vec()));
        if self.fail_on.as_deref() == Some(command) {
            return Err(OperationError::CommandFailed {
                command: command.to_string(),
                code: Some(1),
            });
        }
        Ok(())
    }
}
