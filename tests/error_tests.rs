//! Error scenario integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with config and environment isolated from the user's session
fn clipwatch(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clipwatch").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("CLIPWATCH_BACKEND")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn invalid_backend_is_usage_error() {
    let home = TempDir::new().unwrap();
    clipwatch(&home)
        .args(["--backend", "carrier-pigeon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid backend"));
}

#[test]
fn invalid_backend_from_env_is_usage_error() {
    let home = TempDir::new().unwrap();
    clipwatch(&home)
        .env("CLIPWATCH_BACKEND", "smoke-signals")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("smoke-signals"));
}

#[test]
fn nothing_to_watch_is_usage_error() {
    let home = TempDir::new().unwrap();
    clipwatch(&home)
        .args(["--no-clipboard", "--no-selection", "--backend", "poll"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Nothing to watch"));
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    clipwatch(&home)
        .args(["config", "get", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    clipwatch(&home)
        .args(["config", "set", "unknown_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_value() {
    let home = TempDir::new().unwrap();
    clipwatch(&home)
        .args(["config", "set", "clipboard", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'true' or 'false'"));
}

#[cfg(target_os = "linux")]
#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    clipwatch(&home)
        .args(["config", "set", "monitor.max_retries", "5"])
        .assert()
        .success();

    clipwatch(&home)
        .args(["config", "get", "monitor.max_retries"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));

    clipwatch(&home)
        .args(["config", "get", "backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[cfg(target_os = "linux")]
#[test]
fn config_init_twice_fails() {
    let home = TempDir::new().unwrap();
    clipwatch(&home).args(["config", "init"]).assert().success();
    clipwatch(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    clipwatch(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("poll_interval_ms"))
        .stdout(predicate::str::contains("250"));
}
