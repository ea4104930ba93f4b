//! Domain logic - pure business rules independent of git operations

pub mod repository;
pub mod tag;
pub mod version;

pub use repository::{CommitStamp, DependencyDeclaration, Manifest, RepositoryDescriptor, VersionRange};
pub use tag::TagRef;
pub use version::{latest_release, maximal_version_tag, ReleaseTag, Version};
