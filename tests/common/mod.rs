//! Helpers building real git repositories for integration tests
#![allow(dead_code)]

use git2::{Commit, Oid, Repository, Signature, Time};
use std::fs;
use std::path::Path;

/// Prints a package manifest as JSON from Package.swift, supporting zero or
/// one `.Package(...)` dependency line.
pub const DUMP_SCRIPT: &str = r#"#!/bin/sh
name=$(sed -n 's/^ *name: "\([^"]*\)".*/\1/p' Package.swift)
line=$(grep '\.Package(' Package.swift)
if [ -z "$line" ]; then
    printf '{"name":"%s","dependencies":[]}' "$name"
    exit 0
fi
url=$(echo "$line" | sed 's/.*url: "\([^"]*\)".*/\1/')
major=$(echo "$line" | sed 's/.*majorVersion: \([0-9]*\).*/\1/')
minor=$(echo "$line" | sed 's/.*minor: \([0-9]*\).*/\1/')
printf '{"name":"%s","dependencies":[{"url":"%s","version":{"lowerBound":"%s.%s.0","upperBound":"%s.0.0"}}]}' \
    "$name" "$url" "$major" "$minor" "$((major + 1))"
"#;

pub fn signature(time: i64) -> Signature<'static> {
    Signature::new("Test User", "test@example.com", &Time::new(time, 0))
        .expect("Could not create signature")
}

pub fn init_repo(path: &Path) -> Repository {
    let repo = Repository::init(path).expect("Could not init git repo");
    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }
    repo
}

/// Write `files` into the workdir and commit them on HEAD at `time`
pub fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str, time: i64) -> Oid {
    let workdir = repo.workdir().expect("Repository has no workdir").to_path_buf();
    let mut index = repo.index().expect("Could not get index");
    for (name, contents) in files {
        fs::write(workdir.join(name), contents).expect("Could not write file");
        index
            .add_path(Path::new(name))
            .expect("Could not add file to index");
    }
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let parents: Vec<Commit> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().expect("Could not peel head")],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&Commit> = parents.iter().collect();

    let signature = signature(time);
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parent_refs,
    )
    .expect("Could not create commit")
}

pub fn tag_lightweight(repo: &Repository, name: &str, target: Oid) {
    let object = repo.find_object(target, None).expect("Could not find object");
    repo.tag_lightweight(name, &object, false)
        .expect("Could not create tag");
}

pub fn tag_annotated(repo: &Repository, name: &str, target: Oid, time: i64) -> Oid {
    let object = repo.find_object(target, None).expect("Could not find object");
    repo.tag(name, &object, &signature(time), "release", false)
        .expect("Could not create annotated tag")
}

/// Package.swift source with an optional dependency on `url` at `major.minor`
pub fn package_swift(name: &str, dependency: Option<(&str, u32, u32)>) -> String {
    let dependencies = match dependency {
        Some((url, major, minor)) => format!(
            "        .Package(url: \"{}\", majorVersion: {}, minor: {}),\n",
            url, major, minor
        ),
        None => String::new(),
    };
    format!(
        "import PackageDescription\n\nlet package = Package(\n    name: \"{}\",\n    dependencies: [\n{}    ]\n)\n",
        name, dependencies
    )
}
