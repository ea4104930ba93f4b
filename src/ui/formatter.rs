//! Pure formatting functions for UI output.
//!
//! Everything printed to the terminal is built here; prompting lives in the
//! parent module.

use console::style;

use crate::analyzer::BumpPlan;
use crate::boundary::BoundaryWarning;
use crate::config::RepositoryEntry;
use crate::domain::{RepositoryDescriptor, Version};
use crate::manifest::UpdatedDependency;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Warning line for a non-fatal condition
pub fn format_boundary_warning(warning: &BoundaryWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), warning)
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{}", format_boundary_warning(warning));
}

/// One line of the plan: `name  last -> new`
pub fn format_plan_line(repository: &RepositoryDescriptor, new_version: Option<Version>) -> String {
    let last = repository
        .last_release
        .as_ref()
        .map(|release| release.name.clone())
        .unwrap_or_else(|| "unreleased".to_string());
    let new = new_version
        .map(|version| version.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!("{:<30} {:>10} -> {}", repository.name, last, new)
}

/// Display the repositories of the working set with their last release and head.
pub fn display_repositories(title: &str, repositories: &[RepositoryDescriptor]) {
    println!("\n{}", style(title).bold());
    for repository in repositories {
        let release = repository
            .last_release
            .as_ref()
            .map(|release| release.name.as_str())
            .unwrap_or("-");
        println!(
            "  {:<30} {:>10}  {}",
            repository.name,
            release,
            style(repository.head.short_hash()).dim()
        );
    }
}

/// Display the affected repositories and their new versions.
pub fn display_plan(plan: &BumpPlan<'_>) {
    if plan.is_empty() {
        println!("\n{}", style("No repository needs a new version").bold());
        return;
    }

    println!("\n{}", style("Proposed versions:").bold());
    for repository in &plan.affected {
        let line = format_plan_line(repository, plan.new_version(repository));
        println!("  {}", style(line).green());
    }
}

/// Display the dependency lines rewritten in one repository.
pub fn display_updated_dependencies(repository: &str, updated: &[UpdatedDependency]) {
    println!("{}", style(repository).bold());
    for dependency in updated {
        println!(
            "  set {} to {}",
            dependency.url,
            style(dependency.version).cyan()
        );
    }
}

/// Display configured repositories, marking those in the allow-list.
pub fn display_configured_repositories(repositories: &[RepositoryEntry], allowed: &[String]) {
    println!("{}", style("Configured repositories:").bold());
    for entry in repositories {
        let marker = if allowed.contains(&entry.name) {
            style("*").green()
        } else {
            style(" ").dim()
        };
        println!("  {} {:<30} {}", marker, entry.name, style(&entry.url).dim());
    }
}

/// Display the command that pushes the update branch by hand.
pub fn display_manual_push_instruction(checkout: &str, remote: &str, branch: &str) {
    println!(
        "\n{} To push this branch later, run:\n  {}",
        style("→").yellow(),
        style(format!("git -C {} push {} {}", checkout, remote, branch)).cyan()
    );
}
