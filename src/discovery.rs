//! Building the working set: which repositories to process, where to clone
//! them, and the descriptor of each checkout.

use crate::boundary::BoundaryWarning;
use crate::config::{Config, RepositoryEntry};
use crate::domain::{latest_release, RepositoryDescriptor};
use crate::error::Result;
use crate::git::Git2Repository;
use crate::manifest::ManifestDumper;
use crate::ui;
use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Parse allow-list contents: one repository name per line.
///
/// Text after `#` is a comment. Lines are trimmed and blank lines skipped.
pub fn parse_allow_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.find('#').map_or(line, |comment| &line[..comment]).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_allow_list(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("Cannot read allow-list {}: {}", path.display(), e),
        )
    })?;
    Ok(parse_allow_list(&contents))
}

/// Configured repositories named in `allowed`, in configuration order.
///
/// Allowed names without a configured repository are reported and skipped.
pub fn select_repositories<'c>(config: &'c Config, allowed: &[String]) -> Vec<&'c RepositoryEntry> {
    for name in allowed {
        if !config.repositories.iter().any(|entry| &entry.name == name) {
            let warning = BoundaryWarning::UnknownRepository { name: name.clone() };
            ui::display_boundary_warning(&warning);
        }
    }
    config.selected_repositories(allowed)
}

/// `<prefix>_<MM_dd_yy>`
pub fn work_directory_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}", prefix, date.format("%m_%d_%y"))
}

/// Create today's work directory under `parent`. It must not exist yet.
pub fn create_work_directory(parent: &Path, prefix: &str) -> Result<PathBuf> {
    let path = parent.join(work_directory_name(prefix, Local::now().date_naive()));
    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "Work directory {} already exists; remove it or choose another one",
                path.display()
            ),
        )
        .into());
    }

    fs::create_dir_all(&path)?;
    tracing::info!(path = %path.display(), "created work directory");
    Ok(path)
}

/// Describe an existing checkout: last release, head commit and manifest
pub fn describe_checkout(
    name: &str,
    clone_url: &str,
    checkout: &Path,
    dumper: &ManifestDumper,
) -> Result<RepositoryDescriptor> {
    let repository = Git2Repository::open(checkout)?;

    let tag_names = repository.tag_names()?;
    let last_release = latest_release(&tag_names, |tag, _| {
        let warning = BoundaryWarning::InvalidVersionTag {
            repository: name.to_string(),
            tag: tag.to_string(),
        };
        ui::display_boundary_warning(&warning);
    });
    let head = repository.head_commit()?;
    let manifest = dumper.dump(checkout, name)?;

    tracing::debug!(
        repository = name,
        release = ?last_release.as_ref().map(|release| release.name.as_str()),
        head = head.short_hash(),
        "described checkout"
    );

    Ok(RepositoryDescriptor {
        name: name.to_string(),
        clone_url: clone_url.to_string(),
        checkout: checkout.to_path_buf(),
        last_release,
        head,
        manifest,
    })
}

/// Clone every entry into `work_directory` and describe it.
///
/// Repositories are processed in parallel; the result keeps the order of
/// `entries`. The first failure aborts the run.
pub fn clone_and_describe(
    entries: &[&RepositoryEntry],
    work_directory: &Path,
    dumper: &ManifestDumper,
) -> Result<Vec<RepositoryDescriptor>> {
    entries
        .par_iter()
        .map(|entry| {
            let checkout = work_directory.join(&entry.name);
            tracing::info!(repository = %entry.name, url = %entry.url, "cloning");
            Git2Repository::clone_into(&entry.url, &checkout)?;
            describe_checkout(&entry.name, &entry.url, &checkout, dumper)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_list() {
        let contents = "\
# core
Kitura
  Kitura-net   # transport

# loggers
HeliumLogger
";
        assert_eq!(
            parse_allow_list(contents),
            vec!["Kitura", "Kitura-net", "HeliumLogger"]
        );
    }

    #[test]
    fn test_parse_empty_allow_list() {
        assert!(parse_allow_list("").is_empty());
        assert!(parse_allow_list("\n# nothing\n   \n").is_empty());
    }

    #[test]
    fn test_work_directory_name() {
        let date = NaiveDate::from_ymd_opt(2017, 3, 7).unwrap();
        assert_eq!(
            work_directory_name("PackagesToUpdate", date),
            "PackagesToUpdate_03_07_17"
        );
    }

    #[test]
    fn test_create_work_directory_refuses_existing() {
        let parent = tempfile::TempDir::new().unwrap();
        let created = create_work_directory(parent.path(), "Packages").unwrap();
        assert!(created.is_dir());

        let err = create_work_directory(parent.path(), "Packages").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_select_repositories_skips_unknown() {
        let config = Config {
            repositories: vec![
                RepositoryEntry {
                    name: "Kitura".to_string(),
                    url: "https://example.com/Kitura.git".to_string(),
                },
                RepositoryEntry {
                    name: "Kitura-net".to_string(),
                    url: "https://example.com/Kitura-net.git".to_string(),
                },
            ],
            ..Config::default()
        };
        let allowed = vec!["Kitura-net".to_string(), "Unknown".to_string()];

        let selected = select_repositories(&config, &allowed);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Kitura-net");
    }
}
