//! Ollama provider implementation for time-agent
//!
//! This module implements the Provider trait for Ollama, connecting to a
//! local Ollama server to generate completions with tool calling and
//! structured output support, and to list the models pulled on it.

use crate::config::OllamaConfig;
use crate::error::{Result, TimeAgentError};
use crate::providers::{
    CompletionResponse, FunctionCall, Message, ModelInfo, Provider, TokenUsage, ToolCall,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Ollama API provider
///
/// Connects to an Ollama server (normally `http://localhost:11434`) and
/// talks to its native `/api/chat` and `/api/tags` endpoints.
///
/// # Examples
///
/// ```no_run
/// use time_agent::config::OllamaConfig;
/// use time_agent::providers::{OllamaProvider, Provider, Message};
///
/// # async fn example() -> time_agent::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default())?;
/// let messages = vec![Message::user("Hello!")];
/// let completion = provider.complete(&messages, &[], None).await?;
/// let message = completion.message;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
    call_counter: AtomicUsize,
}

/// Response from Ollama's /api/tags endpoint
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

/// Model metadata from /api/tags
#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    modified_at: Option<String>,
}

/// Request structure for Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<OllamaTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    options: OllamaOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    think: Option<String>,
    stream: bool,
}

/// Sampling options for Ollama API
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Message structure for Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OllamaToolCall>>,
}

/// Tool definition for Ollama API
#[derive(Debug, Serialize)]
struct OllamaTool {
    r#type: String,
    function: OllamaFunction,
}

/// Function definition for Ollama tools
#[derive(Debug, Serialize)]
struct OllamaFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

/// Tool call in Ollama format
#[derive(Debug, Serialize, Deserialize)]
struct OllamaToolCall {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    function: OllamaFunctionCall,
}

/// Function call details in Ollama format
#[derive(Debug, Serialize, Deserialize)]
struct OllamaFunctionCall {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

/// Response structure from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use time_agent::config::OllamaConfig;
    /// use time_agent::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("time-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TimeAgentError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self {
            client,
            config,
            call_counter: AtomicUsize::new(0),
        })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.host.trim_end_matches('/'), path)
    }

    /// Convert messages to Ollama format
    fn convert_messages(&self, messages: &[Message]) -> Vec<OllamaMessage> {
        crate::providers::validate_message_sequence(messages)
            .into_iter()
            .filter_map(|m| {
                if m.content.is_none() && m.tool_calls.is_none() {
                    return None;
                }

                let tool_calls = m.tool_calls.map(|calls| {
                    calls
                        .into_iter()
                        .map(|tc| OllamaToolCall {
                            id: tc.id,
                            function: OllamaFunctionCall {
                                name: tc.function.name,
                                arguments: serde_json::from_str(&tc.function.arguments)
                                    .unwrap_or_else(|_| serde_json::json!({})),
                            },
                        })
                        .collect()
                });

                Some(OllamaMessage {
                    role: m.role,
                    content: m.content.unwrap_or_default(),
                    tool_calls,
                })
            })
            .collect()
    }

    /// Convert tool schemas to Ollama format
    fn convert_tools(&self, tools: &[serde_json::Value]) -> Vec<OllamaTool> {
        tools
            .iter()
            .filter_map(|t| {
                let obj = t.as_object()?;
                let name = obj.get("name")?.as_str()?.to_string();
                let description = obj
                    .get("description")
                    .and_then(|d| d.as_str())
                    .unwrap_or_default()
                    .to_string();
                let parameters = obj
                    .get("parameters")
                    .cloned()
                    .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}}));

                Some(OllamaTool {
                    r#type: "function".to_string(),
                    function: OllamaFunction {
                        name,
                        description,
                        parameters,
                    },
                })
            })
            .collect()
    }

    /// Convert Ollama response message back to the shared format
    ///
    /// Ollama does not always assign tool call ids, so missing ones are
    /// synthesized from a per-provider counter.
    fn convert_response_message(&self, ollama_msg: OllamaMessage) -> Message {
        match ollama_msg.tool_calls {
            Some(tool_calls) if !tool_calls.is_empty() => {
                let converted_calls = tool_calls
                    .into_iter()
                    .map(|tc| ToolCall {
                        id: if tc.id.is_empty() {
                            format!("call_{}", self.call_counter.fetch_add(1, Ordering::Relaxed))
                        } else {
                            tc.id
                        },
                        function: FunctionCall {
                            name: tc.function.name,
                            arguments: serde_json::to_string(&tc.function.arguments)
                                .unwrap_or_else(|_| "{}".to_string()),
                        },
                    })
                    .collect();

                Message::assistant_with_tools(converted_calls)
            }
            _ => Message::assistant(ollama_msg.content),
        }
    }

    fn build_request(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
        format: Option<&serde_json::Value>,
    ) -> OllamaRequest {
        OllamaRequest {
            model: self.config.model.clone(),
            messages: self.convert_messages(messages),
            tools: self.convert_tools(tools),
            format: format.cloned(),
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
            think: self.config.reasoning_effort.clone(),
            stream: false,
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
        format: Option<&serde_json::Value>,
    ) -> Result<CompletionResponse> {
        let url = self.endpoint("api/chat");
        let ollama_request = self.build_request(messages, tools, format);

        tracing::debug!(
            "Sending Ollama request: {} messages, {} tools, structured={}",
            ollama_request.messages.len(),
            ollama_request.tools.len(),
            ollama_request.format.is_some()
        );

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                TimeAgentError::Provider(format!(
                    "Ollama request to {} failed (is the server running?): {}",
                    url, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(TimeAgentError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            TimeAgentError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            ollama_response.done,
            ollama_response.prompt_eval_count,
            ollama_response.eval_count
        );

        let message = self.convert_response_message(ollama_response.message);

        let response = if ollama_response.prompt_eval_count > 0 || ollama_response.eval_count > 0 {
            let usage = TokenUsage::new(
                ollama_response.prompt_eval_count,
                ollama_response.eval_count,
            );
            CompletionResponse::with_usage(message, usage)
        } else {
            CompletionResponse::new(message)
        };

        Ok(response)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.endpoint("api/tags");
        tracing::debug!("Fetching models from Ollama: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Failed to fetch Ollama models: {}", e);
            TimeAgentError::Provider(format!("Failed to connect to Ollama server: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(TimeAgentError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let tags: OllamaTagsResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama tags response: {}", e);
            TimeAgentError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        let models: Vec<ModelInfo> = tags
            .models
            .into_iter()
            .map(|tag| ModelInfo {
                name: tag.name,
                size_bytes: tag.size,
                modified_at: tag.modified_at,
            })
            .collect();

        tracing::debug!("Fetched {} models from Ollama", models.len());
        Ok(models)
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }
}

/// Format byte size for display
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.1}{}", size, UNITS[unit_idx])
}
