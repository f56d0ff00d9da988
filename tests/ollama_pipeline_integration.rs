//! Integration tests for the time workflow against a mocked Ollama server
//!
//! The Ollama HTTP API and the worldtimeapi endpoint are served by wiremock,
//! so these tests exercise the real provider, agents, tool and graph.

use serde_json::json;
use std::sync::Arc;
use time_agent::config::{Config, OllamaConfig, TimeSource};
use time_agent::providers::{create_provider, OllamaProvider, Provider};
use time_agent::{TimeAgentError, TimePipeline};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.provider.ollama.host = server.uri();
    config
}

#[tokio::test]
async fn test_pipeline_end_to_end_with_local_clock() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(common::FakeOllama::naming("October", "🎃"))
        .expect(3)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let provider = create_provider(&config.provider).unwrap();
    let pipeline = TimePipeline::new(provider, &config).unwrap();

    let report = pipeline
        .run("Asia/Seoul", "What is the current time?")
        .await
        .unwrap();

    assert_eq!(report.timezone, "Asia/Seoul");
    assert_eq!(report.utc_offset, "+09:00");
    assert_eq!(report.month_name, "October");
    assert_eq!(report.month_emoji, "🎃");

    let hour: u32 = report.current_time[11..13].parse().unwrap();
    assert_eq!(report.am, hour < 12);
    assert_eq!(report.pm, hour >= 12);

    let value = serde_json::to_value(&report).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    for key in [
        "current_time",
        "timezone",
        "utc_offset",
        "month_name",
        "month_emoji",
        "AM",
        "PM",
    ] {
        assert!(keys.iter().any(|k| k.as_str() == key), "missing {}", key);
    }
}

#[tokio::test]
async fn test_pipeline_uses_world_time_api_and_routes_pm() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(common::FakeOllama::naming("October", "🎃"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/timezone/America/New_York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "abbreviation": "EDT",
            "datetime": "2025-10-19T21:15:42.123456-04:00",
            "timezone": "America/New_York",
            "utc_offset": "-04:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.time.source = TimeSource::WorldTimeApi;
    config.time.world_time_api_url = server.uri();

    let provider = create_provider(&config.provider).unwrap();
    let pipeline = TimePipeline::new(provider, &config).unwrap();
    let report = pipeline
        .run("America/New_York", "What is the current time?")
        .await
        .unwrap();

    assert_eq!(report.current_time, "2025-10-19 21:15:42.123456-04:00");
    assert_eq!(report.utc_offset, "-04:00");
    assert!(!report.am);
    assert!(report.pm);
}

#[tokio::test]
async fn test_requests_carry_model_options_and_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("\"think\":\"low\""))
        .and(body_string_contains("\"stream\":false"))
        .and(body_string_contains("month_name_output_emoji"))
        .and(body_string_contains(
            "Return the name of the month and also return an emoji",
        ))
        .respond_with(common::FakeOllama::naming("October", "🎃"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("time_data_output"))
        .and(body_string_contains("\"name\":\"get_time\""))
        .respond_with(common::FakeOllama::naming("October", "🎃"))
        .expect(2)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let provider = create_provider(&config.provider).unwrap();
    let pipeline = TimePipeline::new(provider, &config).unwrap();

    pipeline.run("UTC", "What is the current time?").await.unwrap();
}

#[tokio::test]
async fn test_world_time_api_failure_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(common::FakeOllama::naming("October", "🎃"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/timezone/Europe/Paris"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.time.source = TimeSource::WorldTimeApi;
    config.time.world_time_api_url = server.uri();

    let provider = create_provider(&config.provider).unwrap();
    let pipeline = TimePipeline::new(provider, &config).unwrap();
    let err = pipeline.run("Europe/Paris", "time?").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TimeAgentError>(),
        Some(TimeAgentError::Tool(msg)) if msg.contains("503")
    ));
}

#[tokio::test]
async fn test_server_error_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"error":"model \"gpt-oss:20b\" not found, try pulling it first"}"#,
        ))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let provider = create_provider(&config.provider).unwrap();
    let pipeline = TimePipeline::new(provider, &config).unwrap();
    let err = pipeline.run("UTC", "time?").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TimeAgentError>(),
        Some(TimeAgentError::Provider(msg)) if msg.contains("try pulling it first")
    ));
}

#[tokio::test]
async fn test_list_models_from_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {
                    "name": "gpt-oss:20b",
                    "modified_at": "2025-08-05T14:10:00Z",
                    "size": 13780173839u64,
                    "digest": "aa4295ac10c3"
                },
                {"name": "qwen3:8b"}
            ]
        })))
        .mount(&server)
        .await;

    let provider = Arc::new(
        OllamaProvider::new(OllamaConfig {
            host: server.uri(),
            ..OllamaConfig::default()
        })
        .unwrap(),
    );

    let models = provider.list_models().await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name, "gpt-oss:20b");
    assert_eq!(models[0].size_bytes, Some(13_780_173_839));
    assert_eq!(models[1].size_bytes, None);
}
