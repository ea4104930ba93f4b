use crate::domain::{RepositoryDescriptor, Version};
use crate::error::{Result, UpdaterError};

/// The repositories whose version is set directly by the release target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreFamily {
    prefixes: Vec<String>,
}

impl CoreFamily {
    /// Core repositories are recognised by display-name prefix
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CoreFamily {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, repository: &RepositoryDescriptor) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| repository.name.starts_with(prefix.as_str()))
    }
}

/// Computes the version an affected repository is bumped to
#[derive(Debug, Clone)]
pub struct VersionPolicy {
    core_family: CoreFamily,
}

impl VersionPolicy {
    pub fn new(core_family: CoreFamily) -> Self {
        VersionPolicy { core_family }
    }

    pub fn core_family(&self) -> &CoreFamily {
        &self.core_family
    }

    /// Core-family repositories get exactly `target_core_version`; any other
    /// repository gets its last release with the minor version bumped.
    ///
    /// # Returns
    /// * `Ok(Version)` - The new version
    /// * `Err(UpdaterError::DependentWithoutBaseline)` - A non-core repository
    ///   has no release to bump from
    pub fn assign(
        &self,
        repository: &RepositoryDescriptor,
        target_core_version: Version,
    ) -> Result<Version> {
        if self.core_family.contains(repository) {
            return Ok(target_core_version);
        }

        let last_release = repository.last_release_version().ok_or_else(|| {
            UpdaterError::DependentWithoutBaseline {
                repository: repository.name.clone(),
            }
        })?;
        last_release.bump_minor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommitStamp, Manifest, ReleaseTag};
    use std::path::PathBuf;

    fn repo(name: &str, release: Option<&str>) -> RepositoryDescriptor {
        RepositoryDescriptor {
            name: name.to_string(),
            clone_url: format!("https://example.com/{}.git", name),
            checkout: PathBuf::from(name),
            last_release: release.map(|tag| ReleaseTag::parse(tag).unwrap()),
            head: CommitStamp::new("head", 0),
            manifest: Manifest::default(),
        }
    }

    fn policy() -> VersionPolicy {
        VersionPolicy::new(CoreFamily::new(["Kitura"]))
    }

    #[test]
    fn test_core_repository_gets_target_version() {
        let kitura = repo("Kitura-net", Some("1.0.3"));
        assert_eq!(
            policy().assign(&kitura, Version::new(1, 4)).unwrap(),
            Version::new(1, 4)
        );
    }

    #[test]
    fn test_core_target_is_not_a_bump() {
        // Even a target below the last release is applied as given
        let kitura = repo("Kitura", Some("2.3.0"));
        assert_eq!(
            policy().assign(&kitura, Version::new(2, 0)).unwrap(),
            Version::new(2, 0)
        );
    }

    #[test]
    fn test_core_repository_without_release_gets_target_version() {
        let kitura = repo("Kitura-Templates", None);
        assert_eq!(
            policy().assign(&kitura, Version::new(1, 1)).unwrap(),
            Version::new(1, 1)
        );
    }

    #[test]
    fn test_dependent_gets_minor_bump() {
        let logger = repo("HeliumLogger", Some("0.5.2"));
        assert_eq!(
            policy().assign(&logger, Version::new(1, 1)).unwrap(),
            Version::new(0, 6)
        );
    }

    #[test]
    fn test_dependent_without_release_is_an_error() {
        let logger = repo("HeliumLogger", None);
        match policy().assign(&logger, Version::new(1, 1)) {
            Err(UpdaterError::DependentWithoutBaseline { repository }) => {
                assert_eq!(repository, "HeliumLogger")
            }
            other => panic!("expected missing baseline error, got {:?}", other),
        }
    }

    #[test]
    fn test_dependent_at_maximum_minor_is_an_error() {
        let logger = repo("HeliumLogger", Some("1.4294967295.0"));
        let result = policy().assign(&logger, Version::new(1, 1));
        assert!(matches!(result, Err(UpdaterError::Version(_))));
    }

    #[test]
    fn test_core_family_prefix_match() {
        let family = CoreFamily::new(vec!["Kitura".to_string(), "Swift-".to_string()]);
        assert!(family.contains(&repo("Kitura-CouchDB", None)));
        assert!(family.contains(&repo("Swift-cfenv", None)));
        assert!(!family.contains(&repo("SwiftyJSON", None)));
        assert!(!family.contains(&repo("kitura-lowercase", None)));
    }

    #[test]
    fn test_empty_core_family_contains_nothing() {
        assert!(!CoreFamily::default().contains(&repo("Kitura", None)));
    }
}
