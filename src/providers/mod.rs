//! Provider module for time-agent
//!
//! This module contains the model provider abstraction and the Ollama
//! implementation used to reach the local model server.

pub mod base;
pub mod ollama;

pub use base::{
    validate_message_sequence, CompletionResponse, FunctionCall, Message, ModelInfo, Provider,
    TokenUsage, ToolCall,
};
pub use ollama::{format_size, OllamaProvider};

use crate::config::ProviderConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create the provider described by the configuration
///
/// # Errors
///
/// Returns error if provider initialization fails
///
/// # Examples
///
/// ```
/// use time_agent::config::ProviderConfig;
/// use time_agent::providers::create_provider;
///
/// let provider = create_provider(&ProviderConfig::default()).unwrap();
/// assert_eq!(provider.get_current_model().unwrap(), "gpt-oss:20b");
/// ```
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    Ok(Arc::new(OllamaProvider::new(config.ollama.clone())?))
}
