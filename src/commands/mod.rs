/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `run`    - Run the agent workflow against the local model server
- `now`    - Print the time report computed locally
- `models` - List models on the local server

Handlers are small and lean on the library components: providers, the
pipeline and timekeeping.
*/

pub mod models;
pub mod now;
pub mod run;

use crate::error::Result;
use crate::timekeeping::TimeReport;

/// Serialize a report for stdout, pretty unless `compact` is set
pub fn render_report(report: &TimeReport, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(report)?
    } else {
        serde_json::to_string_pretty(report)?
    };
    Ok(rendered)
}
