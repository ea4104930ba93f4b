// tests/config_test.rs
use package_updater::analyzer::CoreFamily;
use package_updater::config::{load_config, Config};
use package_updater::UpdaterError;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert!(config.core_family.is_empty());
    assert!(config.repositories.is_empty());
    assert_eq!(config.allow_list, PathBuf::from("repos_to_update.txt"));
    assert_eq!(config.work_directory_prefix, "PackagesToUpdate");
}

#[test]
fn test_default_values() {
    let config = Config::default();
    assert_eq!(config.manifest.file, PathBuf::from("Package.swift"));
    assert_eq!(
        config.manifest.dump_command,
        vec!["swift", "package", "dump-package"]
    );
    assert_eq!(config.git.remote, "origin");
    assert_eq!(config.git.branch, "automatic_version_update");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
core_family = ["Kitura"]
work_directory_prefix = "Updates"

[git]
branch = "bump"

[[repositories]]
name = "Kitura"
url = "https://github.com/IBM-Swift/Kitura.git"

[[repositories]]
name = "HeliumLogger"
url = "https://github.com/IBM-Swift/HeliumLogger.git"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.core_family(), CoreFamily::new(["Kitura"]));
    assert_eq!(config.work_directory_prefix, "Updates");
    assert_eq!(config.git.branch, "bump");
    // Unset keys keep their defaults
    assert_eq!(config.git.remote, "origin");
    assert_eq!(config.manifest.file, PathBuf::from("Package.swift"));
    assert_eq!(config.repositories.len(), 2);
    assert_eq!(config.repositories[1].name, "HeliumLogger");
}

#[test]
#[serial]
fn test_manifest_config_from_fixture() {
    let config = load_config(Some(Path::new("tests/fixtures/config_with_manifest.toml")))
        .expect("Failed to load test config");
    assert_eq!(config.manifest.file, PathBuf::from("Package.swift"));
    assert_eq!(config.manifest.dump_command, vec!["cat", "package.json"]);
    assert_eq!(config.allow_list, PathBuf::from("tests/fixtures/allow_list.txt"));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"core_family = Kitura").unwrap();
    temp_file.flush().unwrap();

    let result = load_config(Some(temp_file.path()));
    assert!(matches!(result, Err(UpdaterError::Config(_))));
}

#[test]
fn test_empty_dump_command_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[manifest]\ndump_command = []\n")
        .unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(err.to_string().contains("dump_command"));
}

#[test]
#[serial]
fn test_missing_explicit_file_is_io_error() {
    let result = load_config(Some(Path::new("tests/fixtures/does_not_exist.toml")));
    assert!(matches!(result, Err(UpdaterError::Io(_))));
}

#[test]
#[serial]
fn test_load_from_current_directory() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("packageupdater.toml"),
        "core_family = [\"Swift-Kuery\"]\n",
    )
    .unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(temp_dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original_dir).unwrap();

    let config = result.unwrap();
    assert_eq!(config.core_family, vec!["Swift-Kuery"]);
}
