//! Integration tests for the `qradar` CLI binary.
//!
//! Argument parsing, help output, completions and error mapping run
//! offline. The request tests point the binary at a wiremock console.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NO_HOME: &str = "/tmp/qradar-cli-test-nonexistent";

/// Build a [`Command`] for the `qradar` binary with env isolation.
fn qradar_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("qradar");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("QRADAR_PROFILE")
        .env_remove("QRADAR_CONSOLE")
        .env_remove("QRADAR_TOKEN")
        .env_remove("QRADAR_API_VERSION")
        .env_remove("QRADAR_OUTPUT")
        .env_remove("QRADAR_INSECURE")
        .env_remove("QRADAR_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn qradar_cmd() -> assert_cmd::Command {
    qradar_cmd_in(Path::new(NO_HOME))
}

/// Command preconfigured to talk to a mock console.
fn console_cmd(uri: &str) -> assert_cmd::Command {
    console_cmd_in(Path::new(NO_HOME), uri)
}

fn console_cmd_in(home: &Path, uri: &str) -> assert_cmd::Command {
    let mut cmd = qradar_cmd_in(home);
    cmd.args(["--console", uri, "--token", "test-token", "--color", "never"]);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// `assert_cmd` blocks, so run it off the runtime driving the mock server.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = qradar_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    qradar_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("QRadar")
            .and(predicate::str::contains("offenses"))
            .and(predicate::str::contains("source-addresses")),
    );
}

#[test]
fn test_version_flag() {
    qradar_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("qradar"));
}

#[test]
fn test_completions_bash() {
    qradar_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_offenses_subcommands_exist() {
    qradar_cmd().args(["offenses", "--help"]).assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("get"))
            .and(predicate::str::contains("update")),
    );
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_bad_range_is_usage_error() {
    let output = qradar_cmd()
        .args(["offenses", "list", "--range", "ten"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("FROM-TO"));
}

#[test]
fn test_invalid_status_rejected() {
    qradar_cmd()
        .args(["offenses", "update", "7", "--status", "resolved"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_assign_and_unassign_conflict() {
    qradar_cmd()
        .args(["offenses", "update", "7", "--assigned-to", "bob", "--unassign"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_update_without_changes_is_rejected_before_any_request() {
    // Port 9 (discard) would fail to connect if a request were attempted.
    let output = console_cmd("http://127.0.0.1:9")
        .args(["offenses", "update", "7"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("nothing to change"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_offenses_list_without_console() {
    let output = qradar_cmd().args(["offenses", "list"]).output().unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("No console configured"));
}

#[test]
fn test_console_without_token() {
    let output = qradar_cmd()
        .args(["--console", "https://qradar.example.com", "offenses", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("No API token"));
}

#[test]
fn test_config_path_prints_toml_location() {
    qradar_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("config.toml\n"));
}

/// Write `contents` to the config file the binary resolves under `home`.
fn write_config(home: &Path, contents: &str) {
    let out = qradar_cmd_in(home).args(["config", "path"]).output().unwrap();
    let path = PathBuf::from(String::from_utf8(out.stdout).unwrap().trim());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, contents).unwrap();
}

#[test]
fn test_config_show_masks_tokens() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        "default_profile = \"prod\"\n\n\
         [profiles.prod]\n\
         console = \"https://qradar.example.com\"\n\
         token = \"super-secret\"\n",
    );

    for format in ["table", "json"] {
        qradar_cmd_in(home.path())
            .args(["--output", format, "config", "show"])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("qradar.example.com")
                    .and(predicate::str::contains("****"))
                    .and(predicate::str::contains("super-secret").not()),
            );
    }
}

// ── Against a mock console ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_offenses_list_json_passes_query_and_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/siem/offenses"))
        .and(query_param("filter", "status = OPEN"))
        .and(header("SEC", "test-token"))
        .and(header("Range", "items=0-49"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 42, "status": "OPEN", "assigned_to": null},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = console_cmd(&server.uri());
    cmd.args([
        "-o",
        "json-compact",
        "offenses",
        "list",
        "--filter",
        "status = OPEN",
        "--range",
        "0-49",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"[{"id":42,"status":"OPEN","assigned_to":null}]"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_offense_update_posts_changes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/siem/offenses/42"))
        .and(body_json(json!({"status": "CLOSED", "closing_reason_id": 1})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 42, "status": "CLOSED"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = console_cmd(&server.uri());
    cmd.args([
        "-o",
        "plain",
        "offenses",
        "update",
        "42",
        "--status",
        "closed",
        "--closing-reason-id",
        "1",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "42");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_offense_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/siem/offenses/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "http_response": {"code": 404, "message": "Not Found"},
            "code": 1002,
            "message": "No offense was found for the provided offense_id",
            "description": "",
        })))
        .mount(&server)
        .await;

    let mut cmd = console_cmd(&server.uri());
    cmd.args(["offenses", "get", "999"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("offense '999' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_source_addresses_plain_lists_ips() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/siem/source_addresses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 5,
            "source_ip": "10.0.0.5",
            "network": "other",
            "domain_id": 0,
            "magnitude": 3,
            "event_flow_count": 12,
            "first_event_flow_seen": 0,
            "last_event_flow_seen": 0,
            "offense_ids": [42],
            "local_destination_address_ids": [],
        }])))
        .mount(&server)
        .await;

    let mut cmd = console_cmd(&server.uri());
    cmd.args(["-o", "plain", "source-addresses", "list"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "10.0.0.5");
}

#[test]
fn test_config_init_writes_profile() {
    let home = tempfile::tempdir().unwrap();
    qradar_cmd_in(home.path())
        .args([
            "--console",
            "https://qradar.example.com",
            "--profile",
            "lab",
            "--api-version",
            "20.0",
            "config",
            "init",
            "--token-env",
            "LAB_TOKEN",
        ])
        .assert()
        .success();

    qradar_cmd_in(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("default_profile = \"lab\"")
                .and(predicate::str::contains("[profiles.lab]"))
                .and(predicate::str::contains("token_env = \"LAB_TOKEN\""))
                .and(predicate::str::contains("api_version = \"20.0\"")),
        );

    qradar_cmd_in(home.path())
        .args(["config", "use", "staging"])
        .assert()
        .failure()
        .code(2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_default_output_applies_without_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/siem/source_addresses"))
        .and(query_param("fields", "id,source_ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "source_ip": "10.0.0.5"},
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), "[defaults]\noutput = \"plain\"\n");

    let mut cmd = console_cmd_in(home.path(), &server.uri());
    cmd.args(["source-addresses", "list", "--fields", "id,source_ip"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "10.0.0.5");

    // An explicit flag still wins over the config default.
    let mut cmd = console_cmd_in(home.path(), &server.uri());
    cmd.args(["-o", "json-compact", "source-addresses", "list", "--fields", "id,source_ip"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("[{\"id\":5,"));
}
