//! Model listing command for time-agent
//!
//! Lists the models pulled on the local Ollama server and checks that the
//! configured model is among them.

use crate::config::Config;
use crate::error::Result;
use crate::providers::{self, format_size, ModelInfo};
use colored::Colorize;
use prettytable::{row, Table};

/// List models available on the local server
///
/// # Examples
///
/// ```no_run
/// use time_agent::config::Config;
/// use time_agent::commands::models::list_models;
///
/// # async fn example() -> anyhow::Result<()> {
/// list_models(&Config::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn list_models(config: &Config) -> Result<()> {
    let ollama = &config.provider.ollama;
    tracing::info!("Listing models from {}", ollama.host);

    let provider = providers::create_provider(&config.provider)?;
    let models = provider.list_models().await?;

    if models.is_empty() {
        println!("No models available from {}", ollama.host);
    } else {
        println!("\nAvailable models from {}:\n", ollama.host);
        models_table(&models, &ollama.model).printstd();
        println!();
    }

    if is_model_pulled(&models, &ollama.model) {
        println!("{} {} is available", "✓".green(), ollama.model.bold());
    } else {
        println!(
            "{} {} is not pulled; run `ollama pull {}`",
            "✗".red(),
            ollama.model.bold(),
            ollama.model
        );
    }

    Ok(())
}

/// Whether `model` is among `models`, treating a missing tag as `:latest`
pub fn is_model_pulled(models: &[ModelInfo], model: &str) -> bool {
    models.iter().any(|m| same_model(&m.name, model))
}

fn same_model(listed: &str, wanted: &str) -> bool {
    let with_tag = |name: &str| {
        if name.contains(':') {
            name.to_string()
        } else {
            format!("{}:latest", name)
        }
    };
    with_tag(listed) == with_tag(wanted)
}

fn models_table(models: &[ModelInfo], configured: &str) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Model Name", "Size", "Modified", "Configured"]);

    for model in models {
        let size = model
            .size_bytes
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        let modified = model.modified_at.as_deref().unwrap_or("-");
        let marker = if same_model(&model.name, configured) {
            "*"
        } else {
            ""
        };

        table.add_row(row![model.name, size, modified, marker]);
    }

    table
}
