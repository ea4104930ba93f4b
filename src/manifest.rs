//! Package manifests: reading them through the dump command, and rewriting
//! dependency versions in the manifest source.

use crate::boundary::BoundaryWarning;
use crate::config::ManifestConfig;
use crate::domain::version::{cached_regex, CachedRegex};
use crate::domain::{Manifest, RepositoryDescriptor, Version};
use crate::error::{Result, UpdaterError};
use crate::ui;
use regex::Captures;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

const PACKAGE_DECLARATION_PATTERN: &str =
    r#"\.Package\(url: "([^"]*)", majorVersion: [0-9]+, minor: [0-9]+\)"#;
static PACKAGE_DECLARATION: CachedRegex = OnceLock::new();

/// A dependency whose version was rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedDependency {
    pub url: String,
    pub version: Version,
}

/// Runs the configured dump command and parses its JSON output
#[derive(Debug, Clone)]
pub struct ManifestDumper {
    command: Vec<String>,
    file: PathBuf,
}

impl ManifestDumper {
    pub fn new(config: &ManifestConfig) -> Self {
        ManifestDumper {
            command: config.dump_command.clone(),
            file: config.file.clone(),
        }
    }

    /// Manifest file name, relative to a checkout
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Dump the manifest of the checkout at `checkout`.
    ///
    /// The command runs with `checkout` as working directory. Output on stderr
    /// is reported as a warning; a non-zero exit status is an error.
    pub fn dump(&self, checkout: &Path, repository: &str) -> Result<Manifest> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| UpdaterError::config("manifest dump command is empty"))?;

        let output = Command::new(program)
            .args(args)
            .current_dir(checkout)
            .output()
            .map_err(|e| {
                UpdaterError::manifest(format!(
                    "Failed to run '{}' in {}: {}",
                    program,
                    checkout.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(UpdaterError::manifest(format!(
                "'{}' failed for {} with exit code {}\nStderr: {}",
                self.command.join(" "),
                repository,
                output.status.code().unwrap_or(-1),
                stderr
            )));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            let warning = BoundaryWarning::ManifestDiagnostics {
                repository: repository.to_string(),
                output: stderr.to_string(),
            };
            ui::display_boundary_warning(&warning);
        }

        let manifest: Manifest = serde_json::from_slice(&output.stdout)?;
        tracing::info!(repository, package = %manifest.name, "dumped package manifest");
        Ok(manifest)
    }
}

/// Replace the declared version of every dependency that has a new version.
///
/// Dependencies are expected as
/// `.Package(url: "<url>", majorVersion: <major>, minor: <minor>)`.
/// Dependencies already declared at their new version are left alone.
///
/// # Returns
/// The rewritten manifest source and the dependencies that were rewritten
pub fn rewrite_dependencies(
    contents: &str,
    manifest: &Manifest,
    new_versions: &BTreeMap<String, Version>,
) -> Result<(String, Vec<UpdatedDependency>)> {
    let mut targets: BTreeMap<&str, Version> = BTreeMap::new();
    let mut updated = Vec::new();

    for dependency in &manifest.dependencies {
        let version = match new_versions.get(&dependency.url) {
            Some(version) => *version,
            None => continue,
        };
        if dependency.version.lower_bound == version.lower_bound() {
            continue;
        }

        tracing::info!(url = %dependency.url, %version, "updating dependency");
        targets.insert(dependency.url.as_str(), version);
        updated.push(UpdatedDependency {
            url: dependency.url.clone(),
            version,
        });
    }

    if targets.is_empty() {
        return Ok((contents.to_string(), updated));
    }

    let re = cached_regex(&PACKAGE_DECLARATION, PACKAGE_DECLARATION_PATTERN)
        .map_err(|e| UpdaterError::manifest(format!("Invalid dependency pattern: {}", e)))?;
    let rewritten = re
        .replace_all(contents, |captures: &Captures| {
            let url = &captures[1];
            match targets.get(url) {
                Some(version) => format!(
                    r#".Package(url: "{}", majorVersion: {}, minor: {})"#,
                    url, version.major, version.minor
                ),
                None => captures[0].to_string(),
            }
        })
        .into_owned();

    Ok((rewritten, updated))
}

/// Check that every rewritten dependency now has its new version as lower bound
pub fn verify_updated(
    repository: &str,
    manifest: &Manifest,
    updated: &[UpdatedDependency],
) -> Result<()> {
    for dependency in updated {
        let found = manifest.dependencies.iter().any(|declared| {
            declared.url == dependency.url
                && declared.version.lower_bound == dependency.version.lower_bound()
        });
        if !found {
            return Err(UpdaterError::manifest(format!(
                "Did not manage to update {} to {} in {}.\n\
                 Verify that the dependency is in format \
                 .Package(url: <https url>, majorVersion: <major>, minor: <minor>), \
                 exactly without redundant whitespace.",
                dependency.url, dependency.version, repository
            )));
        }
    }
    Ok(())
}

/// Commit message for a manifest update: summary line, then one line per dependency
pub fn commit_message(manifest_file: &Path, updated: &[UpdatedDependency]) -> String {
    let details: String = updated
        .iter()
        .map(|dependency| format!("set version {} to {}\n", dependency.url, dependency.version))
        .collect();
    format!(
        "updated dependency versions in {}\n\n{}",
        manifest_file.display(),
        details
    )
}

/// Rewrite a repository's manifest file for `new_versions` and verify the result.
///
/// The file is only written when at least one dependency changes.
pub fn update_manifest(
    repository: &RepositoryDescriptor,
    dumper: &ManifestDumper,
    new_versions: &BTreeMap<String, Version>,
) -> Result<Vec<UpdatedDependency>> {
    let path = repository.checkout.join(dumper.file());
    tracing::info!(repository = %repository.name, path = %path.display(), "update dependencies");

    let contents = fs::read_to_string(&path)?;
    let (rewritten, updated) = rewrite_dependencies(&contents, &repository.manifest, new_versions)?;
    if updated.is_empty() {
        return Ok(updated);
    }

    fs::write(&path, rewritten)?;
    let manifest = dumper.dump(&repository.checkout, &repository.name)?;
    verify_updated(&repository.name, &manifest, &updated)?;

    Ok(updated)
}

/// Toolchain version file, relative to a checkout
pub const SWIFT_VERSION_FILE: &str = ".swift-version";

/// Write `swift_version` to the checkout's `.swift-version` file.
///
/// # Returns
/// `true` when the file was created or its content changed
pub fn update_swift_version(checkout: &Path, swift_version: &str) -> Result<bool> {
    let path = checkout.join(SWIFT_VERSION_FILE);
    let contents = format!("{}\n", swift_version.trim());

    match fs::read_to_string(&path) {
        Ok(existing) if existing == contents => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), swift_version, "updated swift version");
    Ok(true)
}

pub fn swift_version_commit_message(swift_version: &str) -> String {
    format!("updated swift version to {}\n", swift_version.trim())
}
