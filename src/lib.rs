//! time-agent - agent workflow CLI library
//!
//! This library asks a locally hosted model for the current time through a
//! small agent workflow, and exposes the pieces that workflow is built from.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `agent`: Conversation history, tool loop and structured output
//! - `providers`: Model provider abstraction and the Ollama implementation
//! - `tools`: Tool registry and the `get_time` tool
//! - `workflow`: Generic state graph with conditional edges
//! - `pipeline`: The time workflow wired from agents and graph nodes
//! - `timekeeping`: Timezone lookup, datetime parsing and the time report
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and its handlers
//!
//! # Example
//!
//! ```no_run
//! use time_agent::{providers::create_provider, Config, TimePipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider)?;
//!     let pipeline = TimePipeline::new(provider, &config)?;
//!     let report = pipeline
//!         .run(&config.time.timezone, &config.time.prompt)
//!         .await?;
//!     println!("{}", serde_json::to_string(&report)?);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod timekeeping;
pub mod tools;
pub mod workflow;

// Re-export commonly used types
pub use agent::Agent;
pub use config::Config;
pub use error::{Result, TimeAgentError};
pub use pipeline::TimePipeline;
pub use timekeeping::TimeReport;
