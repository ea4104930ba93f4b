use crate::domain::repository::CommitStamp;
use crate::error::{Result, UpdaterError};

/// A git tag and the object it identifies.
///
/// For lightweight tags `target` is the tagged commit; for annotated tags it
/// is the tag object itself (its own hash and the tagger time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub target: CommitStamp,
}

impl TagRef {
    pub fn new(name: impl Into<String>, target: CommitStamp) -> Self {
        TagRef {
            name: name.into(),
            target,
        }
    }
}

/// Find the single tag named exactly `tag_name`.
///
/// # Returns
/// * `Ok(&TagRef)` - Exactly one tag has that name
/// * `Err(UpdaterError::TagResolution)` - No tag or several tags match
pub fn resolve_exact<'a>(repository: &str, tags: &'a [TagRef], tag_name: &str) -> Result<&'a TagRef> {
    let mut matching = tags.iter().filter(|tag| tag.name == tag_name);

    match (matching.next(), matching.next()) {
        (Some(tag), None) => Ok(tag),
        (first, _) => Err(UpdaterError::TagResolution {
            repository: repository.to_string(),
            tag: tag_name.to_string(),
            matches: first.map_or(0, |_| 2 + matching.count()),
        }),
    }
}
