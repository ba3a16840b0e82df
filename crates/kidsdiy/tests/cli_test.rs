//! Integration tests for the `kidsdiy` binary.
//!
//! Argument parsing, help and completions run offline; page commands run
//! against a wiremock backend with config and cookie dirs in a tempdir.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `kidsdiy` with every config and data dir pointed into `home`, and no
/// `KIDSDIY_*` variables leaking in from the environment.
fn kidsdiy_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("kidsdiy");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("KIDSDIY_PROFILE")
        .env_remove("KIDSDIY_API_URL")
        .env_remove("KIDSDIY_TOKEN")
        .env_remove("KIDSDIY_OUTPUT")
        .env_remove("KIDSDIY_INSECURE")
        .env_remove("KIDSDIY_TIMEOUT")
        .env_remove("KIDSDIY_PASSWORD")
        .env_remove("KIDSDIY_LISTEN")
        .env_remove("RUST_LOG");
    cmd
}

/// Run against `server` with a bearer token.
fn backend_cmd(home: &Path, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = kidsdiy_cmd(home);
    cmd.args(["--api-url", &server.uri(), "--token", "T"]);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_get(server: &MockServer, at: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = kidsdiy_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    kidsdiy_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("feed")
            .and(predicate::str::contains("live"))
            .and(predicate::str::contains("profile"))
            .and(predicate::str::contains("resources"))
            .and(predicate::str::contains("serve")),
    );
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    kidsdiy_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = kidsdiy_cmd(home.path())
        .args(["--output", "xml", "feed"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_profile_subcommands_exist() {
    let home = tempfile::tempdir().unwrap();
    kidsdiy_cmd(home.path())
        .args(["profile", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("show")
                .and(predicate::str::contains("edit"))
                .and(predicate::str::contains("avatar")),
        );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_feed_without_backend_mentions_config() {
    let home = tempfile::tempdir().unwrap();
    kidsdiy_cmd(home.path())
        .arg("feed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config init").or(predicate::str::contains("api-url")));
}

#[test]
fn test_config_show_without_file() {
    let home = tempfile::tempdir().unwrap();
    kidsdiy_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    kidsdiy_cmd(home.path())
        .args(["config", "set", "api_base_url", "http://127.0.0.1:8000"])
        .assert()
        .success();
    kidsdiy_cmd(home.path())
        .args(["config", "set", "password", "hunter22"])
        .assert()
        .success();

    kidsdiy_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("api_base_url = \"http://127.0.0.1:8000\"")
                .and(predicate::str::contains("hunter22").not()),
        );
}

#[test]
fn test_config_path_prints_toml_location() {
    let home = tempfile::tempdir().unwrap();
    kidsdiy_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Pages against a backend ─────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_feed_json_sends_token_and_resolves_media() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/posts/"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "title": "Paper rocket",
            "likes": 4,
            "images": ["/media/rocket.png"],
            "user": { "username": "ada" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    backend_cmd(home.path(), &server)
        .args(["--output", "json", "posts"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Paper rocket")
                .and(predicate::str::contains(format!("{}/media/rocket.png", server.uri()))),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_prints_error_line() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/api/posts/posts/",
        401,
        json!({ "detail": "Not authenticated" }),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    let output = backend_cmd(home.path(), &server).arg("feed").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Error: Not authenticated"),
        "{}",
        combined_output(&output)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_live_join_prints_channel() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/api/chat/sessions/",
        200,
        json!([{
            "id": 9,
            "host": { "username": "grace", "first_name": "Grace", "last_name": "Hopper" },
            "channel_name": "robotics-101",
            "start_time": "2026-10-18T15:00:00Z",
            "is_active": true
        }]),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    backend_cmd(home.path(), &server)
        .args(["sessions", "join", "9"])
        .assert()
        .success()
        .stdout(predicate::str::diff("robotics-101\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resources_search_filters_by_title() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/api/posts/resources/",
        200,
        json!([
            { "id": 1, "title": "Alpha", "user": { "username": "a" } },
            { "id": 2, "title": "beta", "user": { "username": "b" } },
            { "id": 3, "title": "Gamma", "user": { "username": "c" } }
        ]),
    )
    .await;

    let home = tempfile::tempdir().unwrap();
    backend_cmd(home.path(), &server)
        .args(["--output", "plain", "resources", "list", "--search", "Gam"])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_resource_is_not_found() {
    let server = MockServer::start().await;
    mock_get(&server, "/api/posts/resources/42/", 404, json!({})).await;

    let home = tempfile::tempdir().unwrap();
    backend_cmd(home.path(), &server)
        .args(["resources", "show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Failed to fetch resource"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_stores_cookie_for_later_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/posts/posts/"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    kidsdiy_cmd(home.path())
        .args(["--api-url", &server.uri(), "login", "--username", "ada", "--password", "secret1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in as ada"));

    kidsdiy_cmd(home.path())
        .args(["--api-url", &server.uri(), "--output", "json", "feed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));

    kidsdiy_cmd(home.path())
        .args(["--api-url", &server.uri(), "logout"])
        .assert()
        .success();
}
