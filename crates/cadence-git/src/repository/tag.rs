use tracing::debug;

use crate::{Result, TagInfo};

use super::Repository;

impl Repository {
    /// Creates an annotated tag on HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot be created or already exists.
    pub fn create_tag(&self, name: &str, message: &str) -> Result<TagInfo> {
        let head = self.inner.head()?.peel_to_commit()?;
        let sig = self.signature()?;

        self.inner
            .tag(name, head.as_object(), &sig, message, false)?;

        debug!(tag = name, commit = %head.id(), "created tag");
        Ok(TagInfo {
            name: name.to_string(),
            target_sha: head.id().to_string(),
        })
    }

    #[must_use]
    pub fn tag_exists(&self, name: &str) -> bool {
        self.inner
            .find_reference(&format!("refs/tags/{name}"))
            .is_ok()
    }
}
