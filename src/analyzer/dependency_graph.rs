use crate::domain::RepositoryDescriptor;

// Dependee terms from https://en.wiktionary.org/wiki/dependee

/// Repositories in `repositories_to_check` that depend on any of `dependees`
pub fn dependent_repositories<'a>(
    repositories_to_check: &[&'a RepositoryDescriptor],
    dependees: &[&RepositoryDescriptor],
) -> Vec<&'a RepositoryDescriptor> {
    repositories_to_check
        .iter()
        .copied()
        .filter(|repository| repository.depends_on_any(dependees))
        .collect()
}

/// Changed repositories plus everything in `repositories_to_check` that
/// transitively depends on them.
///
/// Each sweep moves the repositories depending on the previous sweep's
/// additions out of the unchecked set. The number of sweeps is bounded by
/// `repositories_to_check.len()`, which also ends the walk on dependency
/// cycles. Dependencies on repositories outside the working set are ignored.
///
/// Result order: `changed_repositories` first, then each sweep in discovery order.
pub fn transitive_closure<'a>(
    repositories_to_check: &[&'a RepositoryDescriptor],
    changed_repositories: &[&'a RepositoryDescriptor],
) -> Vec<&'a RepositoryDescriptor> {
    // A changed repository trivially depends on itself
    let mut affected: Vec<&RepositoryDescriptor> = changed_repositories.to_vec();
    let mut frontier: Vec<&RepositoryDescriptor> = changed_repositories.to_vec();
    let mut remaining: Vec<&RepositoryDescriptor> = repositories_to_check
        .iter()
        .copied()
        .filter(|repository| !frontier.contains(repository))
        .collect();

    let maximal_iterations = repositories_to_check.len();
    let mut iteration = 0;

    while !frontier.is_empty() && iteration < maximal_iterations {
        tracing::debug!(iteration, "calculating transitive closure of dependencies");
        iteration += 1;

        let next = dependent_repositories(&remaining, &frontier);
        if !next.is_empty() {
            tracing::info!(
                repositories = ?next.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
                "repositories that depend on changed repositories"
            );
        }

        remaining.retain(|repository| !next.contains(repository));
        affected.extend(next.iter().copied());
        frontier = next;
    }

    affected
}
