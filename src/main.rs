use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use package_updater::cli::orchestration::{run_update_workflow, UpdateWorkflowArgs};
use package_updater::config::{self, Config};
use package_updater::discovery;
use package_updater::domain::Version;
use package_updater::ui;

#[derive(clap::Parser)]
#[command(
    name = "package-updater",
    version,
    about = "Propagate a new core version through the dependency versions of a repository fleet"
)]
struct Args {
    #[arg(
        required_unless_present = "list",
        help = "Version of the core family, as <major>.<minor>"
    )]
    core_version: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "File listing the repositories to process")]
    allow_list: Option<PathBuf>,

    #[arg(
        short,
        long,
        default_value = ".",
        help = "Directory in which the work directory is created"
    )]
    work_dir: PathBuf,

    #[arg(short, long, help = "Branch receiving the manifest updates")]
    branch: Option<String>,

    #[arg(long, help = "Preview new versions without changing any repository")]
    dry_run: bool,

    #[arg(long, help = "Push the update branches to the remote")]
    push: bool,

    #[arg(
        short,
        long,
        value_name = "VERSION",
        help = "Swift toolchain version to write to .swift-version of updated repositories"
    )]
    swift_version: Option<String>,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Show configured repositories and exit")]
    list: bool,

    #[arg(short, long, help = "Print debug logs")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    if args.list {
        list_configured_repositories(&config, args.allow_list.as_deref());
        return Ok(());
    }

    let core_version: Version = match args.core_version.as_deref().unwrap_or_default().parse() {
        Ok(version) => version,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let workflow_args = UpdateWorkflowArgs {
        core_version,
        allow_list: args.allow_list,
        work_dir: args.work_dir,
        branch: args.branch,
        force: args.force,
        dry_run: args.dry_run,
        push: args.push,
        swift_version: args.swift_version,
    };

    match run_update_workflow(&workflow_args, &config) {
        Ok(result) => {
            if !result.committed.is_empty() {
                println!(
                    "\n{} Updated {} repositories in {}\n",
                    console::style("✓").green(),
                    result.committed.len(),
                    result.work_directory.display()
                );
            }
            Ok(())
        }
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn list_configured_repositories(config: &Config, allow_list: Option<&std::path::Path>) {
    if config.repositories.is_empty() {
        ui::display_error("No repositories configured in packageupdater.toml");
        std::process::exit(1);
    }

    let path = allow_list.unwrap_or(&config.allow_list);
    let allowed = discovery::read_allow_list(path).unwrap_or_else(|e| {
        tracing::warn!("{}", e);
        Vec::new()
    });
    ui::display_configured_repositories(&config.repositories, &allowed);
}
