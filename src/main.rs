//! time-agent - ask a local model what time it is
//!
#![doc = "Main entry point for the time-agent application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use time_agent::cli::{Cli, Commands};
use time_agent::commands;
use time_agent::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Run {
            timezone,
            prompt,
            compact,
        } => {
            tracing::info!("Starting time workflow");
            if let Some(tz) = &timezone {
                tracing::debug!("Using timezone override: {}", tz);
            }
            if let Some(prompt_text) = &prompt {
                tracing::debug!("Using prompt: {}", prompt_text);
            }
            commands::run::run_workflow(&config, timezone, prompt, compact).await?;
            Ok(())
        }
        Commands::Now {
            timezone,
            system,
            compact,
        } => {
            commands::now::show_now(&config, timezone.as_deref(), system, compact)?;
            Ok(())
        }
        Commands::Models => {
            tracing::info!("Starting model listing");
            commands::models::list_models(&config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so stdout carries only command output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "time_agent=debug"
    } else {
        "time_agent=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
