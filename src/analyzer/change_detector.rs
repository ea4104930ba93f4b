use crate::boundary::BoundaryWarning;
use crate::domain::{tag, CommitStamp, RepositoryDescriptor};
use crate::error::Result;
use crate::git::TagSource;
use crate::ui;

/// Decides whether a repository changed since its last release
pub struct ChangeDetector<'s, S: TagSource> {
    source: &'s S,
}

impl<'s, S: TagSource> ChangeDetector<'s, S> {
    pub fn new(source: &'s S) -> Self {
        ChangeDetector { source }
    }

    /// Compare the repository's head against the commit of its last release tag.
    ///
    /// A repository that was never released has no baseline and counts as
    /// changed. The release tag must be found by its exact name exactly once.
    ///
    /// # Returns
    /// * `Ok(true)` - The head is newer than the release
    /// * `Ok(false)` - The head is the release, or not later than it
    /// * `Err(UpdaterError::TagResolution)` - The release tag is missing or ambiguous
    pub fn was_changed(&self, repository: &RepositoryDescriptor) -> Result<bool> {
        let release = match &repository.last_release {
            Some(release) => release,
            None => {
                let warning = BoundaryWarning::MissingBaseline {
                    repository: repository.name.clone(),
                };
                ui::display_boundary_warning(&warning);
                return Ok(true);
            }
        };

        let tags = self.source.tags(repository)?;
        let release_tag = tag::resolve_exact(&repository.name, &tags, &release.name)?;

        tracing::debug!(
            repository = %repository.name,
            tag = %release.name,
            tag_commit = %release_tag.target.short_hash(),
            tag_time = release_tag.target.time,
            head_commit = %repository.head.short_hash(),
            head_time = repository.head.time,
            "comparing head with release"
        );

        Ok(is_later_commit(&repository.head, &release_tag.target))
    }
}

/// Whether `head` is a later commit than the one `tag` identifies.
///
/// Lightweight tags carry the commit hash, so an equal hash means nothing
/// changed. Annotated tags carry the tag object's hash, which never equals a
/// commit hash, so for those the timestamps decide.
pub fn is_later_commit(head: &CommitStamp, tag: &CommitStamp) -> bool {
    if head.hash == tag.hash {
        return false;
    }
    head.time > tag.time
}
