//! `now` command: the time report without a model

use super::render_report;
use crate::config::Config;
use crate::error::Result;
use crate::timekeeping::{self, TimeReport};
use chrono_tz::Tz;

/// Resolve which timezone `now` should report in
///
/// `--system` wins, then an explicit timezone, then the configured one.
pub fn resolve_timezone(config: &Config, timezone: Option<&str>, system: bool) -> Result<Tz> {
    if system {
        return Ok(timekeeping::local_timezone());
    }
    timekeeping::parse_timezone(timezone.unwrap_or(&config.time.timezone))
}

/// Compute the report for the current moment in `tz`
pub fn local_report(tz: Tz) -> TimeReport {
    TimeReport::from_datetime(&timekeeping::now_in(tz), tz.name())
}

/// Print the locally computed time report
pub fn show_now(config: &Config, timezone: Option<&str>, system: bool, compact: bool) -> Result<()> {
    let tz = resolve_timezone(config, timezone, system)?;
    tracing::debug!("Computing local time report for {}", tz.name());

    println!("{}", render_report(&local_report(tz), compact)?);
    Ok(())
}
