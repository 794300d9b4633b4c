//! Config resolution against a real throwaway git repository.
//!
//! These tests mutate the process working directory, so they run serially.

use std::fs;
use std::path::Path;
use std::process::Command;

use godot_asset_library_client::config::{Config, RawConfig};
use godot_asset_library_client::Error;
use serial_test::serial;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("git should be runnable");
    assert!(status.success(), "git {args:?} failed");
}

/// Creates a repo with one commit on `main` and a github remote.
fn repo_fixture() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "user.name", "Test"]);
    git(
        dir.path(),
        &["commit", "-q", "--allow-empty", "-m", "initial"],
    );
    git(
        dir.path(),
        &["remote", "add", "origin", "git@github.com:owner/plugin.git"],
    );
    dir
}

const PROJECT_GODOT: &str = r#"
[application]
config/name="My Plugin"
config/description="A useful plugin"
config/version="1.2.3"
config/features=PackedStringArray("4.2", "GL Compatibility")
config/icon="res://icon.svg"
"#;

const MINIMAL_YAML: &str = r#"
asset_id: "123"
category: 1
project_license: MIT
"#;

#[test]
#[serial]
fn resolves_repo_branch_and_project_fields() {
    let dir = repo_fixture();
    fs::write(dir.path().join("project.godot"), PROJECT_GODOT).unwrap();
    fs::write(dir.path().join("asset.yaml"), MINIMAL_YAML).unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let config = Config::from_file("asset.yaml").expect("config should resolve");

    assert_eq!(config.asset_id, "123");
    assert_eq!(config.repo, "owner/plugin");
    assert_eq!(config.repo_hosting.name(), "GitHub");
    assert_eq!(config.branch, "main");
    assert!(!config.git_hash.is_empty());
    assert_eq!(config.project_name.as_deref(), Some("My Plugin"));
    assert_eq!(config.project_version.as_deref(), Some("1.2.3"));
    assert_eq!(config.godot_version.as_deref(), Some("4.2"));
    assert_eq!(
        config.raw_url(),
        "https://raw.githubusercontent.com/owner/plugin/refs/heads/main"
    );
    assert_eq!(config.browse_url(), "https://github.com/owner/plugin");
    assert_eq!(config.description().unwrap(), "A useful plugin");
}

#[test]
#[serial]
fn feature_branch_fails_without_override() {
    let dir = repo_fixture();
    fs::write(dir.path().join("asset.yaml"), MINIMAL_YAML).unwrap();
    git(dir.path(), &["checkout", "-q", "-b", "feature"]);
    std::env::set_current_dir(dir.path()).unwrap();

    let result = Config::from_file("asset.yaml");
    assert!(
        matches!(result, Err(Error::UnsafeBranch { ref branch }) if branch == "feature"),
        "expected UnsafeBranch, got {result:?}"
    );
}

#[test]
#[serial]
fn branch_override_bypasses_safety_check() {
    let dir = repo_fixture();
    let yaml = format!("{MINIMAL_YAML}branch: feature\n");
    fs::write(dir.path().join("asset.yaml"), yaml).unwrap();
    git(dir.path(), &["checkout", "-q", "-b", "feature"]);
    std::env::set_current_dir(dir.path()).unwrap();

    let config = Config::from_file("asset.yaml").expect("override should bypass the check");
    assert_eq!(config.branch, "feature");
}

#[test]
#[serial]
fn repo_override_keeps_detected_branch() {
    let dir = repo_fixture();
    let yaml = format!("{MINIMAL_YAML}repo: someone/else\nrepo_hosting: BitBucket\n");
    fs::write(dir.path().join("asset.yaml"), yaml).unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let config = Config::from_file("asset.yaml").expect("config should resolve");
    assert_eq!(config.repo, "someone/else");
    assert_eq!(config.repo_hosting.name(), "BitBucket");
    // Branch detection is independent of the repo override.
    assert_eq!(config.branch, "main");
    assert_eq!(
        config.raw_url(),
        "https://bitbucket.org/someone/else/raw/main"
    );
}

#[test]
#[serial]
fn multiple_remotes_are_ambiguous() {
    let dir = repo_fixture();
    fs::write(dir.path().join("asset.yaml"), MINIMAL_YAML).unwrap();
    git(
        dir.path(),
        &["remote", "add", "mirror", "git@gitlab.com:owner/plugin.git"],
    );
    std::env::set_current_dir(dir.path()).unwrap();

    let result = Config::from_file("asset.yaml");
    assert!(matches!(result, Err(Error::AmbiguousRemote(_))));
}

#[test]
#[serial]
fn unknown_hosting_override_is_rejected() {
    let dir = repo_fixture();
    let yaml = format!("{MINIMAL_YAML}repo: o/r\nrepo_hosting: sourceforge\n");
    fs::write(dir.path().join("asset.yaml"), yaml).unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let result = Config::from_file("asset.yaml");
    assert!(matches!(result, Err(Error::Resolution { .. })));
}

#[test]
fn raw_parse_applies_defaults() {
    let raw: RawConfig = serde_yaml::from_str(MINIMAL_YAML).unwrap();
    assert_eq!(raw.asset_id, "123");
    assert_eq!(raw.category, 1);
    assert!(raw.previews.is_empty());
    assert!(raw.description_files.is_empty());
    assert!(raw.repo.is_none());
    assert!(raw.branch.is_none());
    assert!(raw.repo_hosting.is_none());
}

#[test]
fn raw_parse_rejects_missing_required_fields() {
    let result: Result<RawConfig, _> = serde_yaml::from_str("category: 1\n");
    assert!(result.is_err());
}

#[test]
fn raw_parse_reads_preview_shorthands() {
    let yaml = r#"
asset_id: "123"
category: 1
project_license: MIT
previews:
  - youtube: XYZ
  - repoimage: shots/one.png
    repothumb: shots/one_thumb.png
"#;
    let raw: RawConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(raw.previews.len(), 2);
    assert_eq!(raw.previews[0].get("youtube"), Some(&"XYZ".into()));
    assert_eq!(
        raw.previews[1].get("repothumb"),
        Some(&"shots/one_thumb.png".into())
    );
}
