use crate::domain::{CommitStamp, RepositoryDescriptor, TagRef};
use crate::error::{Result, UpdaterError};
use crate::git::TagSource;
use std::collections::HashMap;

/// Mock tag source keyed by clone URL, for testing without git checkouts
pub struct MockRepository {
    tags: HashMap<String, Vec<TagRef>>,
    failing: HashMap<String, String>,
}

impl MockRepository {
    /// Create a new empty mock
    pub fn new() -> Self {
        MockRepository {
            tags: HashMap::new(),
            failing: HashMap::new(),
        }
    }

    /// Add a tag to the repository with the given clone URL
    pub fn add_tag(&mut self, clone_url: impl Into<String>, name: impl Into<String>, target: CommitStamp) {
        self.tags
            .entry(clone_url.into())
            .or_default()
            .push(TagRef::new(name, target));
    }

    /// Make tag listing fail for the repository with the given clone URL
    pub fn fail_listing(&mut self, clone_url: impl Into<String>, message: impl Into<String>) {
        self.failing.insert(clone_url.into(), message.into());
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TagSource for MockRepository {
    fn tags(&self, repository: &RepositoryDescriptor) -> Result<Vec<TagRef>> {
        if let Some(message) = self.failing.get(repository.identity()) {
            return Err(UpdaterError::Git(git2::Error::from_str(message)));
        }
        Ok(self
            .tags
            .get(repository.identity())
            .cloned()
            .unwrap_or_default())
    }
}
