//! Agent module for time-agent
//!
//! This module contains the conversation history and the agent execution
//! loop, including typed structured output on top of the tool loop.

pub mod conversation;
pub mod core;

pub use conversation::Conversation;
pub use core::Agent;
