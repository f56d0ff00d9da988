//! Configuration management for time-agent
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, TimeAgentError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Main configuration structure for time-agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Agent behavior configuration
    #[serde(default)]
    pub agent: AgentConfig,
    /// Time lookup configuration
    #[serde(default)]
    pub time: TimeConfig,
}

/// Provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Reasoning effort passed as Ollama's `think` option ("low", "medium", "high")
    #[serde(default = "default_reasoning_effort")]
    pub reasoning_effort: Option<String>,

    /// Timeout for a single HTTP request to the server (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "gpt-oss:20b".to_string()
}

fn default_reasoning_effort() -> Option<String> {
    Some("low".to_string())
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
            temperature: 0.0,
            reasoning_effort: default_reasoning_effort(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of model round trips per agent run
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Timeout for an entire agent run (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// How many times a malformed structured answer is sent back for correction
    #[serde(default = "default_output_retries")]
    pub output_retries: usize,

    /// Tool execution settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_max_turns() -> usize {
    10
}

fn default_timeout() -> u64 {
    300
}

fn default_output_retries() -> usize {
    1
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            timeout_seconds: default_timeout(),
            output_retries: default_output_retries(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Tool execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Maximum size of tool output (bytes)
    #[serde(default = "default_max_output")]
    pub max_output_size: usize,
}

fn default_max_output() -> usize {
    65_536
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            max_output_size: default_max_output(),
        }
    }
}

/// Where the `get_time` tool reads the current time from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeSource {
    /// System clock and the bundled timezone database
    #[default]
    Local,
    /// A worldtimeapi.org compatible HTTP endpoint
    WorldTimeApi,
}

impl FromStr for TimeSource {
    type Err = TimeAgentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "world_time_api" | "worldtimeapi" => Ok(Self::WorldTimeApi),
            other => Err(TimeAgentError::Config(format!(
                "Invalid time source: {}. Must be one of: local, world_time_api",
                other
            ))),
        }
    }
}

/// Time lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// IANA timezone used when none is given on the command line
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Prompt sent to the time agent
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Backing source for the `get_time` tool
    #[serde(default)]
    pub source: TimeSource,

    /// Base URL of the worldtimeapi compatible service
    #[serde(default = "default_world_time_api_url")]
    pub world_time_api_url: String,
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_prompt() -> String {
    "What is the current time?".to_string()
}

fn default_world_time_api_url() -> String {
    "http://worldtimeapi.org".to_string()
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            prompt: default_prompt(),
            source: TimeSource::default(),
            world_time_api_url: default_world_time_api_url(),
        }
    }
}

const VALID_REASONING_EFFORTS: [&str; 3] = ["low", "medium", "high"];

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TimeAgentError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| TimeAgentError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("TIME_AGENT_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("TIME_AGENT_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(timezone) = std::env::var("TIME_AGENT_TIMEZONE") {
            self.time.timezone = timezone;
        }

        if let Ok(source) = std::env::var("TIME_AGENT_TIME_SOURCE") {
            match source.parse() {
                Ok(value) => self.time.source = value,
                Err(e) => tracing::warn!("Ignoring TIME_AGENT_TIME_SOURCE: {}", e),
            }
        }

        if let Ok(max_turns) = std::env::var("TIME_AGENT_MAX_TURNS") {
            if let Ok(value) = max_turns.parse() {
                self.agent.max_turns = value;
            } else {
                tracing::warn!("Invalid TIME_AGENT_MAX_TURNS: {}", max_turns);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(host) = &cli.ollama_host {
            self.provider.ollama.host = host.clone();
        }

        if let Some(model) = &cli.model {
            self.provider.ollama.model = model.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `TimeAgentError::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        let ollama = &self.provider.ollama;

        if ollama.host.trim().is_empty() {
            return Err(
                TimeAgentError::Config("provider.ollama.host cannot be empty".to_string()).into(),
            );
        }

        if ollama.model.trim().is_empty() {
            return Err(
                TimeAgentError::Config("provider.ollama.model cannot be empty".to_string()).into(),
            );
        }

        if !(0.0..=2.0).contains(&ollama.temperature) {
            return Err(TimeAgentError::Config(
                "provider.ollama.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if let Some(effort) = &ollama.reasoning_effort {
            if !VALID_REASONING_EFFORTS.contains(&effort.as_str()) {
                return Err(TimeAgentError::Config(format!(
                    "Invalid reasoning effort: {}. Must be one of: {}",
                    effort,
                    VALID_REASONING_EFFORTS.join(", ")
                ))
                .into());
            }
        }

        if ollama.request_timeout_seconds == 0 {
            return Err(TimeAgentError::Config(
                "provider.ollama.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.agent.max_turns == 0 || self.agent.max_turns > 100 {
            return Err(TimeAgentError::Config(
                "agent.max_turns must be between 1 and 100".to_string(),
            )
            .into());
        }

        if self.agent.timeout_seconds == 0 {
            return Err(TimeAgentError::Config(
                "agent.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.agent.tools.max_output_size == 0 {
            return Err(TimeAgentError::Config(
                "agent.tools.max_output_size must be greater than 0".to_string(),
            )
            .into());
        }

        crate::timekeeping::parse_timezone(&self.time.timezone)?;

        Ok(())
    }
}
