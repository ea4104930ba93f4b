// tests/integration_test.rs
use std::process::Command;

#[test]
fn test_package_updater_help() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "package-updater", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("package-updater"));
    assert!(stdout.contains("core version"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--swift-version"));
}

#[test]
fn test_package_updater_version() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "package-updater", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_core_version_is_rejected() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--bin",
            "package-updater",
            "--",
            "--config",
            "tests/fixtures/config_with_manifest.toml",
            "1.2.3",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("1.2.3"), "stderr: {}", stderr);
}

#[test]
fn test_list_shows_allowed_repositories() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--bin",
            "package-updater",
            "--",
            "--config",
            "tests/fixtures/config_with_manifest.toml",
            "--list",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Kitura-net"));
    assert!(stdout.contains("https://github.com/IBM-Swift/Kitura.git"));
}

#[test]
fn test_version_parsing_and_bumping() {
    use package_updater::domain::{maximal_version_tag, Version};

    let version: Version = "1.2".parse().expect("Should parse version");
    assert_eq!(version, Version::new(1, 2));
    assert_eq!(version.bump_minor().unwrap(), Version::new(1, 3));
    assert_eq!(version.lower_bound(), semver::Version::new(1, 2, 0));

    let tags = ["0.9.0", "1.10.0", "1.9.5", "v2.0.0", "latest"];
    assert_eq!(maximal_version_tag(&tags), Some(Version::new(1, 10)));
}

#[test]
fn test_core_family_assignment() {
    use package_updater::analyzer::{CoreFamily, VersionPolicy};
    use package_updater::domain::{CommitStamp, Manifest, ReleaseTag, RepositoryDescriptor};
    use std::path::PathBuf;

    let policy = VersionPolicy::new(CoreFamily::new(["Kitura"]));
    let repository = |name: &str, tag: &str| RepositoryDescriptor {
        name: name.to_string(),
        clone_url: format!("https://github.com/IBM-Swift/{}.git", name),
        checkout: PathBuf::from(name),
        last_release: Some(ReleaseTag::parse(tag).unwrap()),
        head: CommitStamp::new("abc", 0),
        manifest: Manifest::default(),
    };

    let target = package_updater::domain::Version::new(1, 7);
    assert_eq!(
        policy.assign(&repository("Kitura-net", "1.6.2"), target).unwrap(),
        target
    );
    assert_eq!(
        policy.assign(&repository("HeliumLogger", "1.6.0"), target).unwrap(),
        package_updater::domain::Version::new(1, 7)
    );
    assert_eq!(
        policy.assign(&repository("SwiftyJSON", "15.0.1"), target).unwrap(),
        package_updater::domain::Version::new(15, 1)
    );
}
