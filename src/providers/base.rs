//! Base provider trait and common types for time-agent
//!
//! This module defines the Provider trait that model backends implement,
//! along with the message types exchanged with them and the metadata used
//! when listing models on a local server.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Message structure for conversation
///
/// Represents a message in the conversation with the model provider.
/// Messages can be from the user, assistant, system, or tool results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system, tool)
    pub role: String,
    /// Content of the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Optional tool calls in the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Optional tool call ID (for tool result messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use time_agent::providers::Message;
    ///
    /// let msg = Message::user("What is the current time?");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role("user", content)
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role("assistant", content)
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role("system", content)
    }

    /// Creates a new tool result message
    ///
    /// # Arguments
    ///
    /// * `tool_call_id` - The ID of the tool call this result corresponds to
    /// * `content` - The tool execution result content
    ///
    /// # Examples
    ///
    /// ```
    /// use time_agent::providers::Message;
    ///
    /// let msg = Message::tool_result("call_123", "2025-10-19T14:03:12-04:00");
    /// assert_eq!(msg.role, "tool");
    /// assert_eq!(msg.tool_call_id, Some("call_123".to_string()));
    /// ```
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Creates an assistant message with tool calls
    pub fn assistant_with_tools(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    fn with_role(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

/// Function call information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function/tool to call
    pub name: String,
    /// Arguments for the function (as JSON string)
    pub arguments: String,
}

/// Tool call structure
///
/// Represents a request from the model to execute a tool with specific arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Function call details
    pub function: FunctionCall,
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use time_agent::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// A model available on the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier (e.g., "gpt-oss:20b")
    pub name: String,
    /// Size on disk in bytes, when reported
    pub size_bytes: Option<u64>,
    /// Last modification timestamp as reported by the provider
    pub modified_at: Option<String>,
}

/// Completion response with message and optional token usage
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The response message from the model
    pub message: Message,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(message: Message, usage: TokenUsage) -> Self {
        Self {
            message,
            usage: Some(usage),
        }
    }
}

/// Provider trait for model backends
///
/// The trait provides a common interface for completing conversations
/// with tool support and optional structured output.
///
/// # Examples
///
/// ```no_run
/// use time_agent::providers::{Provider, Message, CompletionResponse};
/// use time_agent::error::Result;
/// use async_trait::async_trait;
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl Provider for FixedProvider {
///     async fn complete(
///         &self,
///         _messages: &[Message],
///         _tools: &[serde_json::Value],
///         _format: Option<&serde_json::Value>,
///     ) -> Result<CompletionResponse> {
///         Ok(CompletionResponse::new(Message::assistant("It is noon")))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes a conversation with the given messages and available tools
    ///
    /// # Arguments
    ///
    /// * `messages` - Conversation history
    /// * `tools` - Available tools for the assistant to use (as JSON schemas)
    /// * `format` - Optional JSON schema the final answer must follow
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or response is invalid
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
        format: Option<&serde_json::Value>,
    ) -> Result<CompletionResponse>;

    /// List available models for this provider
    ///
    /// The default implementation reports that listing is unsupported.
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Err(crate::error::TimeAgentError::Provider(
            "Model listing is not supported by this provider".to_string(),
        )
        .into())
    }

    /// Get the name of the currently active model
    fn get_current_model(&self) -> Result<String> {
        Err(crate::error::TimeAgentError::Provider(
            "Current model information is not available from this provider".to_string(),
        )
        .into())
    }
}

/// Validates message sequence and removes orphan tool messages
///
/// An orphan tool message is a `tool` message with no `tool_call_id`, or
/// whose id matches no tool call of a preceding assistant message.
///
/// # Examples
///
/// ```
/// use time_agent::providers::{Message, validate_message_sequence};
///
/// let messages = vec![
///     Message::user("What time is it?"),
///     Message::tool_result("call_123", "noon"),
/// ];
/// let validated = validate_message_sequence(&messages);
/// assert_eq!(validated.len(), 1);
/// ```
pub fn validate_message_sequence(messages: &[Message]) -> Vec<Message> {
    let mut seen_tool_ids: HashSet<&str> = HashSet::new();
    let mut validated = Vec::with_capacity(messages.len());

    for message in messages {
        if message.role == "assistant" {
            if let Some(tool_calls) = &message.tool_calls {
                seen_tool_ids.extend(tool_calls.iter().map(|tc| tc.id.as_str()));
            }
        } else if message.role == "tool" {
            match &message.tool_call_id {
                Some(id) if seen_tool_ids.contains(id.as_str()) => {}
                Some(id) => {
                    tracing::warn!("Dropping orphan tool message with tool_call_id: {}", id);
                    continue;
                }
                None => {
                    tracing::warn!("Dropping tool message without tool_call_id");
                    continue;
                }
            }
        }

        validated.push(message.clone());
    }

    validated
}
