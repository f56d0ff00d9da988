//! Conversation history for a single agent run

use crate::providers::{Message, TokenUsage, ToolCall};

/// Ordered message history sent to the provider on every turn
///
/// The system prompt, when present, is always the first message.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    usage: TokenUsage,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation that starts with a system prompt
    ///
    /// # Examples
    ///
    /// ```
    /// use time_agent::agent::Conversation;
    ///
    /// let conversation = Conversation::with_system_prompt("Be brief.");
    /// assert_eq!(conversation.len(), 1);
    /// assert_eq!(conversation.messages()[0].role, "system");
    /// ```
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.messages.push(Message::system(prompt));
        conversation
    }

    /// Append a user message
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append an assistant text message
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Append an assistant message that requested tool calls
    pub fn add_assistant_tool_calls(&mut self, content: Option<String>, tool_calls: Vec<ToolCall>) {
        let mut message = Message::assistant_with_tools(tool_calls);
        message.content = content;
        self.messages.push(message);
    }

    /// Append the result of a tool call
    pub fn add_tool_result(&mut self, tool_call_id: impl Into<String>, content: impl Into<String>) {
        self.messages.push(Message::tool_result(tool_call_id, content));
    }

    /// Fold provider-reported token usage into the running total
    pub fn record_usage(&mut self, usage: &TokenUsage) {
        self.usage = TokenUsage::new(
            self.usage.prompt_tokens + usage.prompt_tokens,
            self.usage.completion_tokens + usage.completion_tokens,
        );
    }

    /// Total token usage reported by the provider so far
    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if there are no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
