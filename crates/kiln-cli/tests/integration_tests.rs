//! Integration tests for the `kiln` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `kiln` running inside `temp`, isolated from the user's config and colours.
fn kiln(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kiln").unwrap();
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// A project with `kiln init --example` already run.
fn initialised() -> TempDir {
    let temp = TempDir::new().unwrap();
    kiln(&temp).args(["init", "--example"]).assert().success();
    temp
}

fn note(temp: &TempDir) -> String {
    fs::read_to_string(temp.path().join("notes/hello-world.md")).unwrap()
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    kiln(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    kiln(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_help() {
    let temp = TempDir::new().unwrap();
    kiln(&temp)
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--set"))
        .stdout(predicate::str::contains("--conflict"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_init_creates_layout() {
    let temp = initialised();
    assert!(temp.path().join("kiln.toml").is_file());
    assert!(temp.path().join(".kiln/generators/note.toml").is_file());
    assert!(temp.path().join(".kiln/templates/note.md").is_file());
    assert!(temp.path().join(".kiln/partials").is_dir());
}

#[test]
fn test_init_keeps_existing_config() {
    let temp = initialised();
    fs::write(temp.path().join("kiln.toml"), "# mine\n").unwrap();

    kiln(&temp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(
        fs::read_to_string(temp.path().join("kiln.toml")).unwrap(),
        "# mine\n"
    );
}

#[test]
fn test_list_and_show() {
    let temp = initialised();

    kiln(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("note"))
        .stdout(predicate::str::contains("A markdown note"));

    let out = kiln(&temp)
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    let listed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(listed[0]["name"], "note");
    assert_eq!(listed[0]["actions"], 1);

    kiln(&temp)
        .args(["show", "note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("title (text)"))
        .stdout(predicate::str::contains("add notes/{{kebabCase title}}.md"));
}

#[test]
fn test_list_empty_project() {
    let temp = TempDir::new().unwrap();
    kiln(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No generators found"));
}

#[test]
fn test_generate_writes_file() {
    let temp = initialised();

    kiln(&temp)
        .args(["generate", "note", "--set", "title=Hello World"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 applied"));

    assert_eq!(note(&temp), "# Hello World\n\ndraft: true\n");
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let temp = initialised();

    kiln(&temp)
        .args(["generate", "note", "--set", "title=Hello World", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("hello-world.md"));

    assert!(!temp.path().join("notes").exists());
}

#[test]
fn test_same_content_is_not_a_conflict() {
    let temp = initialised();
    for _ in 0..2 {
        kiln(&temp)
            .args(["generate", "note", "--set", "title=Hello World"])
            .assert()
            .success();
    }
    assert_eq!(note(&temp), "# Hello World\n\ndraft: true\n");
}

#[test]
fn test_conflict_strategies() {
    let temp = initialised();
    kiln(&temp)
        .args(["generate", "note", "--set", "title=Hello World"])
        .assert()
        .success();

    // Default `ask` with nobody to ask halts before touching the file.
    kiln(&temp)
        .args(["generate", "note", "-s", "title=Hello World", "-s", "draft=false"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Run halted"));
    assert!(note(&temp).contains("draft: true"));

    kiln(&temp)
        .args(["generate", "note", "-s", "title=Hello World", "-s", "draft=false"])
        .args(["--conflict", "skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 skipped"));
    assert!(note(&temp).contains("draft: true"));

    kiln(&temp)
        .args(["generate", "note", "-s", "title=Hello World", "-s", "draft=false"])
        .args(["--conflict", "overwrite", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+draft: false"));
    assert!(note(&temp).contains("draft: false"));
}

#[test]
fn test_conflict_strategy_from_environment() {
    let temp = initialised();
    kiln(&temp)
        .args(["generate", "note", "--set", "title=Hello World"])
        .assert()
        .success();

    kiln(&temp)
        .env("KILN_STRATEGY__CONFLICT_RESOLUTION", "overwrite")
        .args(["generate", "note", "-s", "title=Hello World", "-s", "draft=no"])
        .assert()
        .success();
    assert!(note(&temp).contains("draft: false"));
}

#[test]
fn test_generate_json_output() {
    let temp = initialised();
    let out = kiln(&temp)
        .args(["--output-format", "json", "generate", "note", "--set", "title=Hello World"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let run: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(run["complete"], true);
    assert_eq!(run["dry"], false);
    assert_eq!(run["reports"].as_array().map(Vec::len), Some(1));
    assert_eq!(run["reports"][0]["status"], "succeed");
}

#[test]
fn test_run_in_other_directory() {
    let temp = initialised();
    let elsewhere = TempDir::new().unwrap();

    kiln(&elsewhere)
        .arg("-C")
        .arg(temp.path())
        .args(["generate", "note", "--set", "title=Hello World"])
        .assert()
        .success();
    assert!(temp.path().join("notes/hello-world.md").is_file());
}

#[test]
fn test_config_get_and_path() {
    let temp = initialised();

    kiln(&temp)
        .args(["config", "get", "strategy.conflict_resolution"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"));

    kiln(&temp)
        .env("KILN_STRATEGY__ERROR_RESOLUTION", "skip")
        .args(["config", "get", "strategy.error_resolution"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skip"));

    kiln(&temp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kiln.toml"));
}

#[test]
fn test_completions() {
    let temp = TempDir::new().unwrap();
    kiln(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kiln"));
}
