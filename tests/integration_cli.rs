//! Binary-level tests for the docaudit CLI.
//!
//! Network-dependent paths (the `check` command against a live repository)
//! are exercised by unit tests with a fake remote; here we cover argument
//! handling and the cache maintenance surface, with the cache and config
//! locations redirected into a temp directory via environment overrides.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A docaudit command isolated from the user's real config and cache.
fn docaudit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docaudit").unwrap();
    cmd.env("DOCAUDIT_CACHE_FILE", dir.path().join("cache.json"));
    cmd.env("DOCAUDIT_CONFIG", dir.path().join("config.toml"));
    cmd
}

#[test]
fn help_lists_the_commands() {
    let dir = TempDir::new().unwrap();
    docaudit(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("cache"));
}

#[test]
fn version_flag_works() {
    let dir = TempDir::new().unwrap();
    docaudit(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("docaudit"));
}

#[test]
fn check_help_shows_the_flags() {
    let dir = TempDir::new().unwrap();
    docaudit(&dir)
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--lenient"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--gate"));
}

#[test]
fn unknown_flag_is_rejected() {
    let dir = TempDir::new().unwrap();
    docaudit(&dir)
        .args(["check", "--definitely-not-a-flag"])
        .assert()
        .failure();
}

#[test]
fn cache_info_reports_an_empty_cache() {
    let dir = TempDir::new().unwrap();
    docaudit(&dir)
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache.json"))
        .stdout(predicate::str::contains("(empty)"));
}

#[test]
fn cache_info_survives_a_corrupt_cache_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cache.json"), "{definitely not json").unwrap();
    docaudit(&dir)
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(empty)"));
}

#[test]
fn cache_info_summarizes_namespaces() {
    let dir = TempDir::new().unwrap();
    let document = r#"{
        "files": {
            "cache_time": 1700000000,
            "entries": {
                "docs/|docs/translations": {"kind": "listing", "value": ["docs/a.md"]}
            }
        }
    }"#;
    std::fs::write(dir.path().join("cache.json"), document).unwrap();
    docaudit(&dir)
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("files: 1 entries"));
}

#[test]
fn cache_clean_removes_the_file() {
    let dir = TempDir::new().unwrap();
    let cache_file = dir.path().join("cache.json");
    std::fs::write(&cache_file, "{}").unwrap();

    docaudit(&dir)
        .args(["cache", "clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));
    assert!(!cache_file.exists());
}

#[test]
fn cache_clean_is_a_no_op_without_a_cache_file() {
    let dir = TempDir::new().unwrap();
    docaudit(&dir)
        .args(["cache", "clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
fn quiet_and_verbose_conflict() {
    let dir = TempDir::new().unwrap();
    docaudit(&dir)
        .args(["cache", "info", "--quiet", "--verbose"])
        .assert()
        .failure();
}
