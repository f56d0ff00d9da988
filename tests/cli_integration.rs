//! End-to-end tests for the `time-agent` binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn time_agent() -> Command {
    let mut cmd = Command::cargo_bin("time-agent").unwrap();
    cmd.env_remove("TIME_AGENT_OLLAMA_HOST")
        .env_remove("TIME_AGENT_OLLAMA_MODEL")
        .env_remove("TIME_AGENT_TIMEZONE")
        .env_remove("TIME_AGENT_TIME_SOURCE")
        .env_remove("TIME_AGENT_MAX_TURNS")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_now_prints_compact_report() {
    let output = time_agent()
        .args(["--config", "does-not-exist.yaml", "now", "--timezone", "UTC", "--compact"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);

    let report = stdout_json(&output);
    assert_eq!(report["timezone"], "UTC");
    assert_eq!(report["utc_offset"], "+00:00");
    assert_ne!(report["AM"], report["PM"]);
    for key in ["current_time", "month_name", "month_emoji"] {
        assert!(report[key].is_string(), "missing {}", key);
    }
}

#[test]
fn test_now_rejects_unknown_timezone() {
    time_agent()
        .args(["--config", "does-not-exist.yaml", "now", "--timezone", "Mars/Olympus_Mons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone: Mars/Olympus_Mons"));
}

#[test]
fn test_now_uses_configured_timezone() {
    let (_temp_dir, config_path) = common::temp_config_file("time:\n  timezone: Asia/Kolkata\n");

    let output = time_agent()
        .arg("--config")
        .arg(&config_path)
        .args(["now", "--compact"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["timezone"], "Asia/Kolkata");
    assert_eq!(report["utc_offset"], "+05:30");
}

#[test]
fn test_environment_overrides_config_file() {
    let (_temp_dir, config_path) = common::temp_config_file("time:\n  timezone: Asia/Kolkata\n");

    let output = time_agent()
        .env("TIME_AGENT_TIMEZONE", "Asia/Tokyo")
        .arg("--config")
        .arg(&config_path)
        .args(["now", "--compact"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["timezone"], "Asia/Tokyo");
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_temp_dir, config_path) = common::temp_config_file("agent:\n  max_turns: 0\n");

    time_agent()
        .arg("--config")
        .arg(&config_path)
        .args(["now"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("agent.max_turns must be between 1 and 100"));
}

#[test]
fn test_malformed_config_is_rejected() {
    let (_temp_dir, config_path) = common::temp_config_file("provider: [not, a, map]\n");

    time_agent()
        .arg("--config")
        .arg(&config_path)
        .args(["now"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_against_mock_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(common::FakeOllama::naming("October", "🎃"))
        .expect(3)
        .mount(&server)
        .await;

    let output = time_agent()
        .args(["--config", "does-not-exist.yaml", "run", "--timezone", "Asia/Seoul"])
        .args(["--ollama-host", server.uri().as_str()])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report = stdout_json(&output);
    assert_eq!(report["timezone"], "Asia/Seoul");
    assert_eq!(report["utc_offset"], "+09:00");
    assert_eq!(report["month_name"], "October");
    assert_eq!(report["month_emoji"], "🎃");
    assert_ne!(report["AM"], report["PM"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_rejects_unknown_timezone_without_model_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    time_agent()
        .args(["--config", "does-not-exist.yaml", "run", "--timezone", "Nowhere/Special"])
        .args(["--ollama-host", server.uri().as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_models_marks_configured_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{"name": "gpt-oss:20b", "size": 13780173839u64}]
        })))
        .mount(&server)
        .await;

    time_agent()
        .args(["--config", "does-not-exist.yaml", "models"])
        .args(["--ollama-host", server.uri().as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-oss:20b"))
        .stdout(predicate::str::contains("12.8GB"))
        .stdout(predicate::str::contains("is available"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_models_reports_missing_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"models": []})))
        .mount(&server)
        .await;

    time_agent()
        .args(["--config", "does-not-exist.yaml", "models", "--model", "qwen3:8b"])
        .args(["--ollama-host", server.uri().as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ollama pull qwen3:8b"));
}

#[test]
fn test_help_lists_subcommands() {
    time_agent()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("now"))
        .stdout(predicate::str::contains("models"));
}
