use crate::analyzer::change_detector::ChangeDetector;
use crate::analyzer::dependency_graph::transitive_closure;
use crate::analyzer::version_policy::VersionPolicy;
use crate::domain::{RepositoryDescriptor, Version};
use crate::error::Result;
use crate::git::TagSource;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Outcome of one orchestration run
#[derive(Debug, Clone)]
pub struct BumpPlan<'a> {
    /// Changed repositories and their transitive dependents, in discovery order
    pub affected: Vec<&'a RepositoryDescriptor>,
    /// New version per affected repository, keyed by clone URL
    pub new_versions: BTreeMap<String, Version>,
}

impl<'a> BumpPlan<'a> {
    pub fn is_empty(&self) -> bool {
        self.affected.is_empty()
    }

    pub fn new_version(&self, repository: &RepositoryDescriptor) -> Option<Version> {
        self.new_versions.get(repository.identity()).copied()
    }
}

/// Composes change detection, dependency propagation and version assignment
pub struct BumpOrchestrator<'s, S: TagSource> {
    detector: ChangeDetector<'s, S>,
    policy: VersionPolicy,
}

impl<'s, S: TagSource> BumpOrchestrator<'s, S> {
    pub fn new(source: &'s S, policy: VersionPolicy) -> Self {
        BumpOrchestrator {
            detector: ChangeDetector::new(source),
            policy,
        }
    }

    /// Repositories whose head moved past their last release.
    ///
    /// Every repository is checked in parallel; results are merged only
    /// after all checks finished, in input order. The first error aborts
    /// the remaining checks.
    pub fn changed_repositories<'a>(
        &self,
        repositories: &'a [RepositoryDescriptor],
    ) -> Result<Vec<&'a RepositoryDescriptor>> {
        let decisions = repositories
            .par_iter()
            .map(|repository| {
                self.detector
                    .was_changed(repository)
                    .map(|changed| (repository, changed))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(decisions
            .into_iter()
            .filter_map(|(repository, changed)| changed.then_some(repository))
            .collect())
    }

    /// Compute which repositories need a new version and what it is.
    ///
    /// # Arguments
    /// * `target_core_version` - Version assigned to core-family repositories
    /// * `repositories` - The full working set
    ///
    /// # Returns
    /// * `Ok(BumpPlan)` - Affected repositories and the new-version mapping
    /// * `Err` - Tag resolution failed or a dependent has no release to bump
    pub fn get_new_versions<'a>(
        &self,
        target_core_version: Version,
        repositories: &'a [RepositoryDescriptor],
    ) -> Result<BumpPlan<'a>> {
        tracing::info!(
            version = %target_core_version,
            repositories = repositories.len(),
            "getting new versions of repositories"
        );

        let changed = self.changed_repositories(repositories)?;
        let unchanged: Vec<&RepositoryDescriptor> = repositories
            .iter()
            .filter(|repository| !changed.contains(repository))
            .collect();

        tracing::info!(
            changed = ?changed.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            unchanged = ?unchanged.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            "change detection finished"
        );

        let affected = transitive_closure(&unchanged, &changed);

        let new_versions = affected
            .iter()
            .map(|repository| {
                self.policy
                    .assign(repository, target_core_version)
                    .map(|version| (repository.identity().to_string(), version))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(BumpPlan {
            affected,
            new_versions,
        })
    }
}
