//! Timezone-aware time helpers for time-agent
//!
//! This module holds everything the agent workflow knows about time without
//! asking a model:
//!
//! - `clock`: timezone resolution, the current instant and parsing of
//!   datetimes returned by a model
//! - `report`: month names and emojis, AM/PM classification and the
//!   `TimeReport` mapping printed at the end of a run

pub mod clock;
pub mod report;

pub use clock::{
    format_offset, local_timezone, now_in, parse_model_datetime, parse_timezone,
    render_datetime,
};
pub use report::{month_emoji, month_name, Meridiem, TimeReport};
