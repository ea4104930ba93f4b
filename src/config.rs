use crate::analyzer::CoreFamily;
use crate::error::{Result, UpdaterError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the complete configuration for package-updater.
///
/// Contains the tracked repositories, the core-family prefixes, and manifest and git settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Name prefixes of the core family
    #[serde(default)]
    pub core_family: Vec<String>,

    #[serde(default = "default_allow_list")]
    pub allow_list: PathBuf,

    #[serde(default = "default_work_directory_prefix")]
    pub work_directory_prefix: String,

    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
}

fn default_allow_list() -> PathBuf {
    PathBuf::from("repos_to_update.txt")
}

fn default_work_directory_prefix() -> String {
    "PackagesToUpdate".to_string()
}

/// A repository of the fleet
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    pub name: String,
    /// Clone URL; must match the URLs dependency declarations use
    pub url: String,
}

/// How manifests are located, dumped and rewritten.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ManifestConfig {
    /// Manifest file, relative to the checkout
    #[serde(default = "default_manifest_file")]
    pub file: PathBuf,

    /// Program and arguments printing the manifest as JSON, run inside the checkout
    #[serde(default = "default_dump_command")]
    pub dump_command: Vec<String>,
}

fn default_manifest_file() -> PathBuf {
    PathBuf::from("Package.swift")
}

fn default_dump_command() -> Vec<String> {
    vec![
        "swift".to_string(),
        "package".to_string(),
        "dump-package".to_string(),
    ]
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            file: default_manifest_file(),
            dump_command: default_dump_command(),
        }
    }
}

/// Branch and remote used when committing version updates.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "automatic_version_update".to_string()
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            core_family: Vec::new(),
            allow_list: default_allow_list(),
            work_directory_prefix: default_work_directory_prefix(),
            manifest: ManifestConfig::default(),
            git: GitConfig::default(),
            repositories: Vec::new(),
        }
    }
}

impl Config {
    pub fn core_family(&self) -> CoreFamily {
        CoreFamily::new(self.core_family.iter().cloned())
    }

    /// Configured repositories whose names are in `allowed`, in configuration order
    pub fn selected_repositories(&self, allowed: &[String]) -> Vec<&RepositoryEntry> {
        self.repositories
            .iter()
            .filter(|entry| allowed.contains(&entry.name))
            .collect()
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `packageupdater.toml` in current directory
/// 3. `.packageupdater.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new("./packageupdater.toml").exists() {
        PathBuf::from("./packageupdater.toml")
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".packageupdater.toml");
        if config_path.exists() {
            config_path
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config_str = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&config_str)
        .map_err(|e| UpdaterError::config(format!("{}: {}", path.display(), e)))?;

    if config.manifest.dump_command.is_empty() {
        return Err(UpdaterError::config("manifest.dump_command must not be empty"));
    }
    Ok(config)
}
