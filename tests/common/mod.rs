use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::{Request, Respond, ResponseTemplate};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Wrap an assistant message in an Ollama `/api/chat` response body
#[allow(dead_code)]
pub fn chat_response(message: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": "gpt-oss:20b",
        "created_at": "2025-10-19T13:05:00Z",
        "message": message,
        "done": true,
        "prompt_eval_count": 42,
        "eval_count": 7
    }))
}

/// Stand-in for a local model that plays both agents of the time workflow
///
/// Requests that advertise tools belong to the time agent: the first one is
/// answered with a `get_time` call, the follow-up echoes the tool output as
/// structured time output. Requests without tools belong to the month agent
/// and get `month_reply` as content.
#[allow(dead_code)]
pub struct FakeOllama {
    pub month_reply: String,
}

#[allow(dead_code)]
impl FakeOllama {
    pub fn naming(month: &str, emoji: &str) -> Self {
        Self {
            month_reply: json!({
                "month_name_output": month,
                "month_name_output_emoji": emoji
            })
            .to_string(),
        }
    }
}

impl Respond for FakeOllama {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };

        let has_tools = body["tools"].as_array().is_some_and(|t| !t.is_empty());
        if !has_tools {
            return chat_response(json!({"role": "assistant", "content": self.month_reply}));
        }

        let tool_output = body["messages"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|m| m["role"] == "tool")
            .and_then(|m| m["content"].as_str())
            .map(str::to_string);

        match tool_output {
            None => chat_response(json!({
                "role": "assistant",
                "content": "",
                "tool_calls": [{"function": {"name": "get_time", "arguments": {}}}]
            })),
            Some(datetime) => {
                let offset = &datetime[datetime.len() - 6..];
                let answer = json!({
                    "time_data_output": datetime,
                    "utc_offset_output": offset
                });
                chat_response(json!({"role": "assistant", "content": answer.to_string()}))
            }
        }
    }
}
