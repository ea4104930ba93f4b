//! Main workflow orchestration logic
//!
//! Keeps CLI argument parsing in main.rs and the update workflow here, so the
//! workflow can be driven programmatically and from tests.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::analyzer::{BumpOrchestrator, BumpPlan, VersionPolicy};
use crate::config::Config;
use crate::discovery;
use crate::domain::{RepositoryDescriptor, Version};
use crate::git::{CheckoutTagSource, Git2Repository};
use crate::manifest::{self, ManifestDumper, UpdatedDependency};
use crate::ui;

/// Arguments for the update workflow
///
/// Mirrors the CLI Args but without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateWorkflowArgs {
    /// Version assigned to the core family
    pub core_version: Version,

    /// Allow-list file, overriding the configured one
    pub allow_list: Option<PathBuf>,

    /// Directory in which the dated work directory is created
    pub work_dir: PathBuf,

    /// Branch receiving the manifest commits, overriding the configured one
    pub branch: Option<String>,

    /// Skip confirmation prompts
    pub force: bool,

    /// Only compute and display the new versions
    pub dry_run: bool,

    /// Push the update branches to the configured remote
    pub push: bool,

    /// Swift toolchain version written to `.swift-version` of every affected repository
    pub swift_version: Option<String>,
}

/// Result of a finished update workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowResult {
    /// Dated directory holding the checkouts
    pub work_directory: PathBuf,

    /// New version per affected repository, keyed by clone URL
    pub new_versions: BTreeMap<String, Version>,

    /// Repositories that got a manifest or swift version commit
    pub committed: Vec<String>,

    /// Repositories whose update branch was pushed
    pub pushed: Vec<String>,
}

/// Main update workflow
///
/// 1. Read the allow-list and select the configured repositories it names
/// 2. Clone them into a fresh work directory and describe each checkout
/// 3. Compute the affected repositories and their new versions
/// 4. Rewrite and commit the manifests of affected repositories on a new branch,
///    along with their `.swift-version` when a swift version is given
/// 5. Optionally push the branches
///
/// Steps 4 and 5 are skipped in dry-run mode or when the user declines.
pub fn run_update_workflow(args: &UpdateWorkflowArgs, config: &Config) -> Result<WorkflowResult> {
    let allow_list_path = args.allow_list.as_deref().unwrap_or(&config.allow_list);
    let allowed = discovery::read_allow_list(allow_list_path)?;
    let entries = discovery::select_repositories(config, &allowed);
    if entries.is_empty() {
        anyhow::bail!(
            "No configured repository is named in {}",
            allow_list_path.display()
        );
    }

    let work_directory =
        discovery::create_work_directory(&args.work_dir, &config.work_directory_prefix)?;
    ui::display_status(&format!(
        "Cloning {} repositories into {}",
        entries.len(),
        work_directory.display()
    ));

    let dumper = ManifestDumper::new(&config.manifest);
    let repositories = discovery::clone_and_describe(&entries, &work_directory, &dumper)
        .context("Failed to prepare repositories")?;
    ui::display_repositories("Repositories:", &repositories);

    let source = CheckoutTagSource;
    let orchestrator = BumpOrchestrator::new(&source, VersionPolicy::new(config.core_family()));
    let plan = orchestrator
        .get_new_versions(args.core_version, &repositories)
        .context("Failed to compute new versions")?;
    ui::display_plan(&plan);

    let mut result = WorkflowResult {
        work_directory,
        new_versions: plan.new_versions.clone(),
        ..WorkflowResult::default()
    };

    if plan.is_empty() {
        return Ok(result);
    }

    if args.dry_run {
        ui::display_status("Dry run: no manifest was changed");
        return Ok(result);
    }

    if !args.force && !ui::confirm_action("Update dependency versions in these repositories?")? {
        println!("Operation cancelled by user.");
        return Ok(result);
    }

    let branch = args.branch.as_deref().unwrap_or(&config.git.branch);
    let committed = commit_updates(&plan, &dumper, branch, args.swift_version.as_deref())?;
    result.committed = committed.iter().map(|r| r.name.clone()).collect();

    for repository in committed {
        if args.push {
            ui::display_status(&format!("Pushing {} of {}", branch, repository.name));
            Git2Repository::open(&repository.checkout)?
                .push_branch(&config.git.remote, branch)
                .with_context(|| format!("Failed to push {}", repository.name))?;
            ui::display_success(&format!("Pushed {} of {}", branch, repository.name));
            result.pushed.push(repository.name.clone());
        } else {
            ui::display_manual_push_instruction(
                &repository.checkout.display().to_string(),
                &config.git.remote,
                branch,
            );
        }
    }

    Ok(result)
}

/// Rewrite the manifest of every affected repository and commit it on `branch`.
///
/// With `swift_version`, the repository's `.swift-version` file is written too
/// and committed separately on the same branch. Repositories where neither
/// file changes get no branch and no commit.
///
/// # Returns
/// The repositories that got a commit
pub fn commit_updates<'a>(
    plan: &BumpPlan<'a>,
    dumper: &ManifestDumper,
    branch: &str,
    swift_version: Option<&str>,
) -> Result<Vec<&'a RepositoryDescriptor>> {
    let mut committed = Vec::new();

    for repository in plan.affected.iter().copied() {
        let git = Git2Repository::open(&repository.checkout)?;

        let updated: Vec<UpdatedDependency> =
            manifest::update_manifest(repository, dumper, &plan.new_versions)
                .with_context(|| format!("Failed to update manifest of {}", repository.name))?;
        let swift_updated = match swift_version {
            Some(version) => manifest::update_swift_version(&repository.checkout, version)
                .with_context(|| format!("Failed to set swift version of {}", repository.name))?,
            None => false,
        };
        if updated.is_empty() && !swift_updated {
            tracing::debug!(repository = %repository.name, "manifest already up to date");
            continue;
        }

        git.create_branch(branch)
            .with_context(|| format!("Failed to create branch {} in {}", branch, repository.name))?;

        if !updated.is_empty() {
            let commit = git.commit_file(
                dumper.file(),
                &manifest::commit_message(dumper.file(), &updated),
            )?;
            ui::display_updated_dependencies(&repository.name, &updated);
            ui::display_success(&format!(
                "Committed {} on {} of {}",
                commit.short_hash(),
                branch,
                repository.name
            ));
        }

        if let Some(version) = swift_version.filter(|_| swift_updated) {
            let commit = git.commit_file(
                Path::new(manifest::SWIFT_VERSION_FILE),
                &manifest::swift_version_commit_message(version),
            )?;
            ui::display_success(&format!(
                "Set swift version {} in {} ({})",
                version.trim(),
                repository.name,
                commit.short_hash()
            ));
        }

        committed.push(repository);
    }

    Ok(committed)
}
