//! Agent core implementation with the tool-calling loop
//!
//! This module implements the agent execution loop that:
//! - Sends the conversation and tool definitions to the provider
//! - Executes tool calls requested by the model
//! - Enforces turn limits and timeouts
//! - Parses structured output and retries when the model gets it wrong

use crate::config::AgentConfig;
use crate::error::{Result, TimeAgentError};
use crate::providers::{Provider, ToolCall};
use crate::tools::{ToolRegistry, ToolResult};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::Conversation;

/// An agent bound to one provider, one tool set and an optional system prompt
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use time_agent::agent::Agent;
/// use time_agent::config::{AgentConfig, OllamaConfig};
/// use time_agent::providers::OllamaProvider;
/// use time_agent::tools::ToolRegistry;
///
/// # async fn example() -> time_agent::error::Result<()> {
/// let provider = Arc::new(OllamaProvider::new(OllamaConfig::default())?);
/// let agent = Agent::new(provider, ToolRegistry::new(), AgentConfig::default())?
///     .with_system_prompt("Answer in one word.");
/// let answer = agent.execute("Which month comes after September?").await?;
/// println!("{}", answer);
/// # Ok(())
/// # }
/// ```
pub struct Agent {
    provider: Arc<dyn Provider>,
    tools: ToolRegistry,
    config: AgentConfig,
    system_prompt: Option<String>,
}

impl Agent {
    /// Creates a new agent instance
    ///
    /// # Arguments
    ///
    /// * `provider` - The provider used for completions
    /// * `tools` - The tools the model may call
    /// * `config` - Agent configuration (limits, timeouts, retries)
    ///
    /// # Errors
    ///
    /// Returns `TimeAgentError::Config` if `max_turns` is zero
    pub fn new(provider: Arc<dyn Provider>, tools: ToolRegistry, config: AgentConfig) -> Result<Self> {
        if config.max_turns == 0 {
            return Err(
                TimeAgentError::Config("max_turns must be greater than 0".to_string()).into(),
            );
        }

        Ok(Self {
            provider,
            tools,
            config,
            system_prompt: None,
        })
    }

    /// Sets the system prompt placed at the start of every run
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Runs the agent on a prompt and returns the model's final text answer
    ///
    /// # Errors
    ///
    /// - `TimeAgentError::MaxIterationsExceeded` if the turn limit is reached
    /// - `TimeAgentError::Timeout` if the run takes longer than `timeout_seconds`
    /// - `TimeAgentError::Provider` if a provider call fails or returns nothing
    /// - `TimeAgentError::Tool` if a tool call cannot be executed
    pub async fn execute(&self, user_prompt: impl Into<String>) -> Result<String> {
        let started = Instant::now();
        let mut iteration = 0;
        let mut conversation = self.start_conversation(user_prompt);
        self.run_turns(&mut conversation, None, started, &mut iteration)
            .await
    }

    /// Runs the agent and parses its answer as `T`
    ///
    /// The JSON schema of `T` is sent to the provider as the response format.
    /// When the answer does not parse, the error is sent back to the model and
    /// the run continues, up to `output_retries` extra attempts. Retries share
    /// the `max_turns` and `timeout_seconds` budget of the run.
    ///
    /// # Errors
    ///
    /// Returns `TimeAgentError::OutputValidation` once the retries are spent,
    /// plus every error [`Agent::execute`] can return.
    pub async fn run_structured<T>(&self, user_prompt: impl Into<String>) -> Result<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let started = Instant::now();
        let schema = serde_json::to_value(schemars::schema_for!(T))?;
        let mut conversation = self.start_conversation(user_prompt);
        let mut iteration = 0;
        let mut attempts = 0;

        loop {
            attempts += 1;
            let content = self
                .run_turns(&mut conversation, Some(&schema), started, &mut iteration)
                .await?;

            match parse_structured::<T>(&content) {
                Ok(value) => {
                    info!(attempts, "Structured output accepted");
                    return Ok(value);
                }
                Err(e) if attempts > self.config.output_retries => {
                    warn!("Structured output rejected after {} attempts: {}", attempts, e);
                    return Err(TimeAgentError::OutputValidation {
                        attempts,
                        message: e.to_string(),
                    }
                    .into());
                }
                Err(e) => {
                    warn!("Structured output rejected, retrying: {}", e);
                    conversation.add_user_message(format!(
                        "Your response could not be parsed: {}. \
                         Respond with a single JSON object matching the requested schema.",
                        e
                    ));
                }
            }
        }
    }

    fn start_conversation(&self, user_prompt: impl Into<String>) -> Conversation {
        let mut conversation = match &self.system_prompt {
            Some(prompt) => Conversation::with_system_prompt(prompt.clone()),
            None => Conversation::new(),
        };
        conversation.add_user_message(user_prompt);
        conversation
    }

    /// Drives the provider until it answers with text
    ///
    /// `iteration` counts provider calls across the whole run.
    async fn run_turns(
        &self,
        conversation: &mut Conversation,
        format: Option<&serde_json::Value>,
        started: Instant,
        iteration: &mut usize,
    ) -> Result<String> {
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let tool_definitions = self.tools.all_definitions();

        loop {
            *iteration += 1;

            if *iteration > self.config.max_turns {
                warn!("Maximum iterations ({}) exceeded", self.config.max_turns);
                return Err(TimeAgentError::MaxIterationsExceeded {
                    limit: self.config.max_turns,
                    message: format!(
                        "Agent exceeded maximum iteration limit of {}",
                        self.config.max_turns
                    ),
                }
                .into());
            }

            let remaining = timeout
                .checked_sub(started.elapsed())
                .ok_or(TimeAgentError::Timeout(self.config.timeout_seconds))?;

            debug!("Iteration {}/{}", iteration, self.config.max_turns);

            let response = tokio::time::timeout(
                remaining,
                self.provider
                    .complete(conversation.messages(), &tool_definitions, format),
            )
            .await
            .map_err(|_| {
                warn!("Agent execution timeout after {:?}", started.elapsed());
                TimeAgentError::Timeout(self.config.timeout_seconds)
            })??;

            if let Some(usage) = &response.usage {
                conversation.record_usage(usage);
            }

            let message = response.message;
            debug!("Provider response: {:?}", message);

            match message.tool_calls {
                Some(tool_calls) if !tool_calls.is_empty() => {
                    debug!("Executing {} tool calls", tool_calls.len());
                    conversation.add_assistant_tool_calls(message.content, tool_calls.clone());

                    for tool_call in &tool_calls {
                        let result = self.execute_tool_call(tool_call).await?;
                        conversation.add_tool_result(&tool_call.id, result.to_message());
                    }
                }
                _ => {
                    let content = message.content.unwrap_or_default();
                    if content.trim().is_empty() {
                        warn!("Provider returned neither content nor tool calls");
                        return Err(TimeAgentError::Provider(
                            "Provider returned invalid response (no content or tool calls)"
                                .to_string(),
                        )
                        .into());
                    }

                    conversation.add_assistant_message(content.clone());
                    info!(
                        "Agent run completed in {} iterations, {} tokens",
                        iteration,
                        conversation.usage().total_tokens
                    );
                    return Ok(content);
                }
            }
        }
    }

    /// Executes a single tool call
    ///
    /// # Errors
    ///
    /// Returns `TimeAgentError::Tool` if the tool is not registered, its
    /// arguments are not valid JSON or its execution fails
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> Result<ToolResult> {
        let tool_name = &tool_call.function.name;
        debug!("Executing tool: {}", tool_name);

        let tool_executor = self
            .tools
            .get(tool_name)
            .ok_or_else(|| TimeAgentError::Tool(format!("Tool not found: {}", tool_name)))?;

        let args: serde_json::Value =
            serde_json::from_str(&tool_call.function.arguments).map_err(|e| {
                TimeAgentError::Tool(format!(
                    "Failed to parse tool arguments for '{}': {}",
                    tool_name, e
                ))
            })?;

        let result = tool_executor.execute(args).await.map_err(|e| {
            TimeAgentError::Tool(format!("Tool '{}' execution failed: {:#}", tool_name, e))
        })?;

        let max_output_size = self.config.tools.max_output_size;
        let original_len = result.output.len();
        let result = result.truncate_if_needed(max_output_size);
        if result.truncated {
            debug!(
                "Tool output truncated from {} to {} bytes",
                original_len, max_output_size
            );
        }

        Ok(result)
    }
}

/// Parses a structured answer, tolerating a surrounding markdown code fence
fn parse_structured<T: DeserializeOwned>(content: &str) -> serde_json::Result<T> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim())
}
