//! The `get_time` tool
//!
//! Returns the current datetime for a timezone fixed when the tool is built.
//! The model never chooses the timezone; it is a dependency injected by the
//! workflow, so the tool takes no arguments.

use crate::config::{TimeConfig, TimeSource};
use crate::error::{Result, TimeAgentError};
use crate::timekeeping;
use crate::tools::{ToolExecutor, ToolResult};
use async_trait::async_trait;
use chrono::SecondsFormat;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Name under which the tool is registered and advertised
pub const TOOL_NAME: &str = "get_time";

/// Subset of a worldtimeapi `/api/timezone/{tz}` response
#[derive(Debug, Deserialize)]
struct WorldTimeResponse {
    datetime: Option<String>,
}

/// Tool returning the current time in a fixed timezone
#[derive(Debug, Clone)]
pub struct GetTimeTool {
    timezone: Tz,
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    Local,
    WorldTimeApi { client: Client, base_url: String },
}

impl GetTimeTool {
    /// Tool backed by the system clock and the bundled timezone database
    ///
    /// # Examples
    ///
    /// ```
    /// use time_agent::tools::GetTimeTool;
    ///
    /// let tool = GetTimeTool::local(chrono_tz::Asia::Seoul);
    /// assert_eq!(tool.timezone(), chrono_tz::Asia::Seoul);
    /// ```
    pub fn local(timezone: Tz) -> Self {
        Self {
            timezone,
            source: Source::Local,
        }
    }

    /// Tool backed by a worldtimeapi compatible service at `base_url`
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn world_time_api(timezone: Tz, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TimeAgentError::Tool(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            timezone,
            source: Source::WorldTimeApi {
                client,
                base_url: base_url.into(),
            },
        })
    }

    /// Build the tool described by the time configuration
    pub fn from_config(timezone: Tz, config: &TimeConfig) -> Result<Self> {
        match config.source {
            TimeSource::Local => Ok(Self::local(timezone)),
            TimeSource::WorldTimeApi => Self::world_time_api(timezone, &config.world_time_api_url),
        }
    }

    /// Timezone this tool reports
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    async fn fetch_world_time(&self, client: &Client, base_url: &str) -> Result<String> {
        let url = format!(
            "{}/api/timezone/{}",
            base_url.trim_end_matches('/'),
            self.timezone.name()
        );
        tracing::debug!("Fetching time from {}", url);

        let response = client.get(&url).send().await.map_err(|e| {
            TimeAgentError::Tool(format!("Time API request to {} failed: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TimeAgentError::Tool(format!(
                "Time API returned error {}: {}",
                status, body
            ))
            .into());
        }

        let body: WorldTimeResponse = response.json().await.map_err(|e| {
            TimeAgentError::Tool(format!("Failed to parse time API response: {}", e))
        })?;

        body.datetime.ok_or_else(|| {
            TimeAgentError::Tool("Time API response has no `datetime` field".to_string()).into()
        })
    }
}

#[async_trait]
impl ToolExecutor for GetTimeTool {
    fn tool_definition(&self) -> serde_json::Value {
        serde_json::json!({
            "name": TOOL_NAME,
            "description": "return the time",
            "parameters": {
                "type": "object",
                "properties": {}
            }
        })
    }

    async fn execute(&self, _args: serde_json::Value) -> Result<ToolResult> {
        let datetime = match &self.source {
            Source::Local => {
                timekeeping::now_in(self.timezone).to_rfc3339_opts(SecondsFormat::Micros, false)
            }
            Source::WorldTimeApi { client, base_url } => {
                self.fetch_world_time(client, base_url).await?
            }
        };

        tracing::info!(timezone = %self.timezone.name(), %datetime, "get_time tool called");
        Ok(ToolResult::success(datetime))
    }
}
