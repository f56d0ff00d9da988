//! Tools module for time-agent
//!
//! This module contains the tool executor trait, the tool registry handed to
//! agents, and the `get_time` tool implementation.

pub mod get_time;

pub use get_time::GetTimeTool;

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Tool result structure
///
/// Represents the result of a tool execution with truncation support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Whether the tool execution succeeded
    pub success: bool,
    /// Output from the tool
    pub output: String,
    /// Error message if execution failed
    pub error: Option<String>,
    /// Whether the output was truncated
    pub truncated: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            truncated: false,
        }
    }

    /// Create a failed tool result
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
            truncated: false,
        }
    }

    /// Truncate output if it exceeds the maximum size
    ///
    /// The cut is moved back to the nearest character boundary so multi-byte
    /// output never panics.
    pub fn truncate_if_needed(mut self, max_size: usize) -> Self {
        if self.output.len() > max_size {
            let mut cut = max_size;
            while !self.output.is_char_boundary(cut) {
                cut -= 1;
            }
            self.output.truncate(cut);
            self.output.push_str("\n... (truncated)");
            self.truncated = true;
        }
        self
    }

    /// Convert to a message string for the conversation
    pub fn to_message(&self) -> String {
        if self.success {
            self.output.clone()
        } else {
            format!(
                "Error: {}",
                self.error.as_deref().unwrap_or("Unknown error")
            )
        }
    }
}

/// Tool executor trait for implementing tool execution logic
///
/// # Examples
///
/// ```no_run
/// use time_agent::tools::{ToolExecutor, ToolResult};
/// use time_agent::error::Result;
/// use async_trait::async_trait;
/// use serde_json::Value;
///
/// struct Echo;
///
/// #[async_trait]
/// impl ToolExecutor for Echo {
///     fn tool_definition(&self) -> Value {
///         serde_json::json!({
///             "name": "echo",
///             "description": "Echo the arguments back",
///             "parameters": {"type": "object", "properties": {}}
///         })
///     }
///
///     async fn execute(&self, args: Value) -> Result<ToolResult> {
///         Ok(ToolResult::success(args.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Returns the tool definition as a JSON value
    ///
    /// The definition follows the function calling format:
    /// `{"name": ..., "description": ..., "parameters": <JSON schema>}`
    fn tool_definition(&self) -> serde_json::Value;

    /// Executes the tool with the given arguments
    ///
    /// # Errors
    ///
    /// Returns error if execution fails
    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult>;
}

/// Tool registry for managing available tools
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolExecutor>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool executor under a name
    pub fn register(&mut self, name: impl Into<String>, executor: Arc<dyn ToolExecutor>) {
        self.tools.insert(name.into(), executor);
    }

    /// Get a tool executor by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolExecutor>> {
        self.tools.get(name).cloned()
    }

    /// All tool definitions, ordered by tool name
    pub fn all_definitions(&self) -> Vec<serde_json::Value> {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| self.tools[name].tool_definition())
            .collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockToolExecutor {
        name: String,
    }

    #[async_trait]
    impl ToolExecutor for MockToolExecutor {
        fn tool_definition(&self) -> serde_json::Value {
            serde_json::json!({
                "name": self.name,
                "description": "Mock tool",
                "parameters": {"type": "object"}
            })
        }

        async fn execute(&self, _args: serde_json::Value) -> Result<ToolResult> {
            Ok(ToolResult::success("mock output"))
        }
    }

    fn mock(name: &str) -> Arc<dyn ToolExecutor> {
        Arc::new(MockToolExecutor {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("output");
        assert!(result.success);
        assert_eq!(result.to_message(), "output");
        assert!(!result.truncated);
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("failed");
        assert!(!result.success);
        assert!(result.output.is_empty());
        assert_eq!(result.to_message(), "Error: failed");
    }

    #[test]
    fn test_tool_result_truncation() {
        let result = ToolResult::success("a".repeat(1000)).truncate_if_needed(100);
        assert!(result.truncated);
        assert!(result.output.starts_with(&"a".repeat(100)));
        assert!(result.output.ends_with("(truncated)"));
    }

    #[test]
    fn test_tool_result_truncation_respects_char_boundaries() {
        // Each emoji is four bytes; cutting at 5 must back off to 4
        let result = ToolResult::success("🎃🎃🎃").truncate_if_needed(5);
        assert!(result.output.starts_with("🎃\n"));
    }

    #[test]
    fn test_tool_result_no_truncation() {
        let result = ToolResult::success("short").truncate_if_needed(100);
        assert!(!result.truncated);
        assert_eq!(result.output, "short");
    }

    #[test]
    fn test_tool_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register("test", mock("test"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("test").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_tool_registry_definitions_are_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register("zeta", mock("zeta"));
        registry.register("alpha", mock("alpha"));

        let all = registry.all_definitions();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["name"], "alpha");
        assert_eq!(all[1]["name"], "zeta");
    }

    #[tokio::test]
    async fn test_tool_executor_execution() {
        let result = mock("test").execute(serde_json::json!({})).await.unwrap();
        assert!(result.success);
    }
}
