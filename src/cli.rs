//! Command-line interface definition for time-agent
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};

/// time-agent - ask a local model what time it is
///
/// Runs a small agent workflow against a local Ollama server: a time agent
/// calls the `get_time` tool, a month agent names the month, and the result
/// is enriched with AM/PM markers.
#[derive(Parser, Debug, Clone)]
#[command(name = "time-agent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the Ollama server URL
    #[arg(long, global = true)]
    pub ollama_host: Option<String>,

    /// Override the model name
    ///
    /// The configured `reasoning_effort` is still sent as Ollama's `think`
    /// option; set `provider.ollama.reasoning_effort: null` for models
    /// without reasoning support.
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for time-agent
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the agent workflow against the local model server
    Run {
        /// IANA timezone to ask about (defaults to the configured timezone)
        #[arg(short, long)]
        timezone: Option<String>,

        /// Prompt sent to the time agent
        #[arg(short, long)]
        prompt: Option<String>,

        /// Print single-line JSON instead of pretty JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the time report computed locally, without a model
    Now {
        /// IANA timezone (defaults to the configured timezone)
        #[arg(short, long)]
        timezone: Option<String>,

        /// Use the system timezone instead of the configured one
        #[arg(long, conflicts_with = "timezone")]
        system: bool,

        /// Print single-line JSON instead of pretty JSON
        #[arg(long)]
        compact: bool,
    },

    /// List models on the local server and check the configured one is pulled
    Models,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build a CLI value with no flags set, for exercising config overrides
    #[cfg(test)]
    pub(crate) fn for_command(command: Commands) -> Self {
        Self {
            config: None,
            verbose: false,
            ollama_host: None,
            model: None,
            command,
        }
    }
}
