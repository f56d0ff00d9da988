//! `run` command: the full agent workflow

use super::render_report;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::TimePipeline;
use crate::providers::create_provider;

/// Run the time workflow and print the final answer as JSON
///
/// # Arguments
///
/// * `config` - Loaded and validated configuration
/// * `timezone` - Timezone override; falls back to `time.timezone`
/// * `prompt` - Prompt override; falls back to `time.prompt`
/// * `compact` - Print single-line JSON
///
/// # Errors
///
/// Returns error if the timezone is unknown, the model server is
/// unreachable, or the model never produces valid structured output
pub async fn run_workflow(
    config: &Config,
    timezone: Option<String>,
    prompt: Option<String>,
    compact: bool,
) -> Result<()> {
    let timezone = timezone.unwrap_or_else(|| config.time.timezone.clone());
    let prompt = prompt.unwrap_or_else(|| config.time.prompt.clone());

    tracing::info!(
        model = %config.provider.ollama.model,
        host = %config.provider.ollama.host,
        "Running time workflow"
    );

    let provider = create_provider(&config.provider)?;
    let pipeline = TimePipeline::new(provider, config)?;
    let report = pipeline.run(&timezone, &prompt).await?;

    println!("{}", render_report(&report, compact)?);
    Ok(())
}
