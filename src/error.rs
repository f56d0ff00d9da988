//! Error types for time-agent
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for time-agent operations
///
/// Covers configuration loading, provider interactions, tool execution,
/// structured output validation and workflow execution.
#[derive(Error, Debug)]
pub enum TimeAgentError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (unreachable server, bad responses)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Tool execution errors
    #[error("Tool execution error: {0}")]
    Tool(String),

    /// Timezone name that the timezone database does not know
    #[error("Invalid timezone: {timezone}")]
    InvalidTimezone {
        /// The rejected timezone name
        timezone: String,
    },

    /// Datetime text that could not be parsed into an offset-aware datetime
    #[error("Invalid datetime: {value}")]
    InvalidDateTime {
        /// The rejected datetime text
        value: String,
    },

    /// Model output that did not match the requested structure
    #[error("Output validation failed after {attempts} attempts: {message}")]
    OutputValidation {
        /// Number of attempts made, including the first one
        attempts: usize,
        /// The last parse error
        message: String,
    },

    /// Agent exceeded maximum iteration limit
    #[error("Agent exceeded maximum iterations: limit={limit}, {message}")]
    MaxIterationsExceeded {
        /// The configured iteration limit
        limit: usize,
        /// Additional context about the failure
        message: String,
    },

    /// Agent execution ran past its deadline
    #[error("Agent execution timeout after {0} seconds")]
    Timeout(u64),

    /// Workflow graph construction or execution errors
    #[error("Workflow error: {0}")]
    Workflow(String),

    /// A workflow node read a state field that no earlier node filled in
    #[error("Workflow state is missing field: {0}")]
    MissingState(&'static str),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for time-agent operations
///
/// Uses `anyhow::Error` so callers can attach context while the
/// typed [`TimeAgentError`] stays recoverable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
