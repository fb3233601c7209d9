//! Integration tests for the `kdash` binary's non-interactive commands.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const KDASH_BIN: &str = env!("CARGO_BIN_EXE_kdash");

/// `kdash` with its config directory pointed into `home`.
fn kdash(home: &Path) -> Command {
    let mut cmd = Command::new(KDASH_BIN);
    cmd.env("XDG_CONFIG_HOME", home).env_remove("KDASH_LOG");
    cmd
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().expect("tempdir");
    kdash(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tui"))
        .stdout(predicate::str::contains("settings"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn config_path_follows_xdg_config_home() {
    let home = TempDir::new().expect("tempdir");
    let expected = home.path().join("kitchen-dashboard").join("config.toml");
    kdash(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().as_ref()));
}

#[test]
fn config_init_refuses_overwrite_without_force() {
    let home = TempDir::new().expect("tempdir");
    kdash(home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration"));

    let path = home.path().join("kitchen-dashboard/config.toml");
    assert!(path.exists());

    kdash(home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    kdash(home.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
    assert!(home
        .path()
        .join("kitchen-dashboard/config.toml.backup")
        .exists());
}

#[test]
fn config_validate_accepts_generated_template() {
    let home = TempDir::new().expect("tempdir");
    kdash(home.path()).args(["config", "init"]).assert().success();
    kdash(home.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_validate_reports_parse_position() {
    let home = TempDir::new().expect("tempdir");
    let path = write_config(&home, "[server]\ntimeout = = \"1s\"\n");
    kdash(home.path())
        .args(["--config", path.to_str().expect("utf8 path"), "config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.toml:2:"));
}

#[test]
fn config_validate_rejects_bad_duration() {
    let home = TempDir::new().expect("tempdir");
    let path = write_config(&home, "[dashboard]\ntick_rate = \"often\"\n");
    kdash(home.path())
        .args(["--config", path.to_str().expect("utf8 path"), "config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dashboard.tick_rate"));
}

#[test]
fn settings_show_prints_profile_mapping() {
    let home = TempDir::new().expect("tempdir");
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/widgets/settings")
            .query_param("profile", "office");
        then.status(200)
            .json_body(json!({"clock": {"enabled": false, "width": 240, "height": 96}}));
    });

    let output = kdash(home.path())
        .args([
            "settings",
            "show",
            "--profile",
            "office",
            "--server",
            &server.base_url(),
        ])
        .output()
        .expect("run kdash");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["clock"]["enabled"], false);
    assert_eq!(value["clock"]["width"], 240);
    assert_eq!(mock.calls(), 1);
}

#[test]
fn settings_push_sends_file_for_profile() {
    let home = TempDir::new().expect("tempdir");
    let file = home.path().join("office.json");
    fs::write(&file, r#"{"weather": {"enabled": true, "width": 320, "height": 160}}"#)
        .expect("write settings");

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/widgets/settings");
        then.status(200).json_body(json!({"status": "ok"}));
    });

    kdash(home.path())
        .args([
            "settings",
            "push",
            "--file",
            file.to_str().expect("utf8 path"),
            "--profile",
            "office",
            "--server",
            &server.base_url(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 1 widget(s) for profile 'office'"));
    assert_eq!(mock.calls(), 1);
}

#[test]
fn settings_show_reports_backend_error() {
    let home = TempDir::new().expect("tempdir");
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/widgets/settings");
        then.status(500).json_body(json!({"error": "database offline"}));
    });

    kdash(home.path())
        .args(["settings", "show", "--server", &server.base_url()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("database offline"));
}

#[test]
fn blank_profile_flag_is_a_config_error() {
    let home = TempDir::new().expect("tempdir");
    kdash(home.path())
        .args(["settings", "show", "--profile", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dashboard.profile"));
}
