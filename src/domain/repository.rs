use crate::domain::version::{ReleaseTag, Version};
use serde::Deserialize;
use std::path::PathBuf;

/// Identity and time of a commit (or of the tag object naming it)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStamp {
    pub hash: String,
    /// Seconds since the Unix epoch
    pub time: i64,
}

impl CommitStamp {
    pub fn new(hash: impl Into<String>, time: i64) -> Self {
        CommitStamp {
            hash: hash.into(),
            time,
        }
    }

    /// First seven characters of the hash
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// Declared version constraint of a dependency
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRange {
    pub lower_bound: semver::Version,
    #[serde(default)]
    pub upper_bound: Option<semver::Version>,
}

/// One dependency a manifest declares
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencyDeclaration {
    /// Clone URL of the depended-upon repository
    pub url: String,
    pub version: VersionRange,
}

/// Package manifest as produced by the manifest dumper
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyDeclaration>,
}

impl Manifest {
    /// Whether any dependency is declared on the given clone URL
    pub fn depends_on(&self, clone_url: &str) -> bool {
        self.dependencies.iter().any(|d| d.url == clone_url)
    }
}

/// A cloned repository with everything the version engine needs to know about it.
///
/// Built once after cloning; the engine only reads it.
#[derive(Debug, Clone)]
pub struct RepositoryDescriptor {
    /// Display name
    pub name: String,
    /// Identity used to join dependency declarations to repositories
    pub clone_url: String,
    /// Local checkout directory
    pub checkout: PathBuf,
    /// Maximal valid release tag, `None` when the repository was never released
    pub last_release: Option<ReleaseTag>,
    pub head: CommitStamp,
    pub manifest: Manifest,
}

impl RepositoryDescriptor {
    /// Stable identity: the clone URL, not the display name
    pub fn identity(&self) -> &str {
        &self.clone_url
    }

    pub fn last_release_version(&self) -> Option<Version> {
        self.last_release.as_ref().map(|release| release.version)
    }

    /// Whether this repository declares a dependency on any of `dependees`
    pub fn depends_on_any(&self, dependees: &[&RepositoryDescriptor]) -> bool {
        dependees
            .iter()
            .any(|dependee| self.manifest.depends_on(dependee.identity()))
    }
}

impl PartialEq for RepositoryDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.clone_url == other.clone_url
    }
}

impl Eq for RepositoryDescriptor {}
