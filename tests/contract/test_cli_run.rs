#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Contract tests for the default `ci-bootstrap` / `ci-bootstrap run` command

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn setup_project(temp_dir: &TempDir, runner_exit: i32) -> PathBuf {
    let venv = temp_dir.path().join("venv");
    let bin = venv.join("bin");
    fs::create_dir_all(&bin).unwrap();
    fs::write(bin.join("activate"), "# fake activate\n").unwrap();
    write_script(&bin.join("pip"), "#!/bin/sh\nexit 0\n");
    write_script(
        &bin.join("py.test"),
        &format!(
            "#!/bin/sh\necho \"runner: $@\"\necho \"{{not json}}\"\nexit {}\n",
            runner_exit
        ),
    );

    let dist = temp_dir.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    fs::write(dist.join("snowflake_sqlalchemy-1.0.0-py3-none-any.whl"), b"wheel").unwrap();

    venv
}

/// The `--json` report follows the runner's output; it is the last
/// top-level object, opened by a line holding only `{`.
fn report_from(stdout: &str) -> serde_json::Value {
    let lines: Vec<&str> = stdout.lines().collect();
    let start = lines.iter().rposition(|line| *line == "{").unwrap();
    serde_json::from_str(&lines[start..].join("\n")).unwrap()
}

fn bootstrap(temp_dir: &TempDir, venv: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ci-bootstrap").unwrap();
    cmd.current_dir(temp_dir)
        .env_remove("CI_BOOTSTRAP_CONFIG")
        .env_remove("CI_BOOTSTRAP_ARTIFACT")
        .env("CI_BOOTSTRAP_VENV", venv)
        .env("ACCOUNT", "acme")
        .env("USER", "ci")
        .env("PASSWORD", "secret")
        .env("SCHEMA", "public");
    cmd
}

#[test]
fn test_no_arguments_runs_the_whole_sequence() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 0);

    bootstrap(&temp_dir, &venv)
        .assert()
        .success()
        .stdout(predicate::str::contains("runner: test"));

    let contents = fs::read_to_string(temp_dir.path().join("test/parameters.py")).unwrap();
    assert!(contents.contains("'account': 'acme'"));
    assert!(contents.contains("'schema': 'public'"));
}

#[test]
fn test_runner_exit_status_is_propagated() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 3);

    bootstrap(&temp_dir, &venv).arg("run").assert().code(3);
}

#[test]
fn test_runner_args_are_forwarded() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 0);

    bootstrap(&temp_dir, &venv)
        .args(["run", "--", "-k", "smoke"])
        .assert()
        .success()
        .stdout(predicate::str::contains("runner: test -k smoke"));
}

#[test]
fn test_missing_venv_fails_with_status_one() {
    let temp_dir = TempDir::new().unwrap();
    setup_project(&temp_dir, 0);
    let missing = temp_dir.path().join("missing-venv");

    bootstrap(&temp_dir, &missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Virtual environment not found"));

    assert!(!temp_dir.path().join("test/parameters.py").exists());
}

#[test]
fn test_missing_artifact_fails_before_render() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 0);
    fs::remove_dir_all(temp_dir.path().join("dist")).unwrap();

    bootstrap(&temp_dir, &venv)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No artifact matches"));

    assert!(!temp_dir.path().join("test/parameters.py").exists());
}

#[test]
fn test_ambiguous_artifact_fails_before_render() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 0);
    fs::write(
        temp_dir.path().join("dist/snowflake_sqlalchemy-1.0.1-py3-none-any.whl"),
        b"wheel",
    )
    .unwrap();

    bootstrap(&temp_dir, &venv)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ambiguous"));

    assert!(!temp_dir.path().join("test/parameters.py").exists());
}

#[test]
fn test_artifact_flag_overrides_default_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 0);
    fs::write(temp_dir.path().join("dist/other-2.0-py3-none-any.whl"), b"wheel").unwrap();

    bootstrap(&temp_dir, &venv)
        .args(["--artifact", "dist/other-*.whl"])
        .assert()
        .success();
}

#[test]
fn test_json_report() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 0);

    let output = bootstrap(&temp_dir, &venv)
        .args(["run", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("{not json}"));
    let report = report_from(&stdout);

    assert_eq!(report["exit_code"], 0);
    assert_eq!(report["completed"].as_array().unwrap().len(), 5);
    assert_eq!(report["failed_stage"], serde_json::Value::Null);
    assert_eq!(report["artifact"]["sha256"].as_str().unwrap().len(), 64);
}

#[test]
fn test_json_report_for_failing_runner() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 2);

    let output = bootstrap(&temp_dir, &venv)
        .args(["run", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let report = report_from(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(report["exit_code"], 2);
    assert_eq!(report["failed_stage"], "run_tests");
    let completed = report["completed"].as_array().unwrap();
    assert_eq!(completed.len(), 4);
    assert!(!completed.contains(&serde_json::json!("run_tests")));
}

#[test]
fn test_config_file_changes_runner_and_test_dir() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 0);
    write_script(
        &venv.join("bin").join("custom-runner"),
        "#!/bin/sh\necho \"custom: $@\"\n",
    );
    fs::write(
        temp_dir.path().join("ci-bootstrap.toml"),
        "runner = \"custom-runner\"\ntest_dir = \"tests/unit\"\nparameters_file = \"tests/parameters.py\"\n",
    )
    .unwrap();

    bootstrap(&temp_dir, &venv)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom: tests/unit"));

    assert!(temp_dir.path().join("tests/parameters.py").exists());
}

#[test]
fn test_invalid_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let venv = setup_project(&temp_dir, 0);
    fs::write(temp_dir.path().join("ci-bootstrap.toml"), "runner = [").unwrap();

    bootstrap(&temp_dir, &venv)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid TOML"));
}
