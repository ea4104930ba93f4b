//! Git operations abstraction layer
//!
//! The version engine never talks to git directly. It asks a [TagSource]
//! for the tags of a repository it has already cloned, so change detection
//! can run against real checkouts or in-memory fixtures alike.
//!
//! - [repository::Git2Repository]: wrapper over a `git2` checkout (clone, tags,
//!   head, branch, commit, push)
//! - [repository::CheckoutTagSource]: [TagSource] over local checkouts
//! - [mock::MockRepository]: in-memory [TagSource] for testing
//!
//! ```rust
//! # use package_updater::git::TagSource;
//! # use package_updater::domain::RepositoryDescriptor;
//! # fn example<S: TagSource>(source: &S, repo: &RepositoryDescriptor) -> package_updater::Result<()> {
//! for tag in source.tags(repo)? {
//!     println!("{} -> {}", tag.name, tag.target.hash);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::{CheckoutTagSource, Git2Repository};

use crate::domain::{RepositoryDescriptor, TagRef};
use crate::error::Result;

/// Lists the tags of a described repository.
///
/// ## Thread Safety
///
/// Change detection queries many repositories in parallel, so implementors
/// must be `Send + Sync`.
pub trait TagSource: Send + Sync {
    /// All tags of `repository`, each with the object it identifies
    ///
    /// Lightweight tags report the tagged commit. Annotated tags report the
    /// tag object (its hash and tagger time).
    fn tags(&self, repository: &RepositoryDescriptor) -> Result<Vec<TagRef>>;
}
