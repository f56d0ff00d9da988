//! The time report mapping and the calendar lookups behind it

use crate::timekeeping::clock::{offset_of, render_datetime};
use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

const MONTHS: [(&str, &str); 12] = [
    ("January", "❄️"),
    ("February", "💝"),
    ("March", "🍀"),
    ("April", "🌷"),
    ("May", "🌸"),
    ("June", "☀️"),
    ("July", "🎆"),
    ("August", "🏖️"),
    ("September", "🍂"),
    ("October", "🎃"),
    ("November", "🦃"),
    ("December", "🎄"),
];

/// English name of a month numbered 1 through 12
///
/// # Examples
///
/// ```
/// use time_agent::timekeeping::month_name;
///
/// assert_eq!(month_name(10), Some("October"));
/// assert_eq!(month_name(13), None);
/// ```
pub fn month_name(month: u32) -> Option<&'static str> {
    month_entry(month).map(|(name, _)| name)
}

/// Emoji representing a month numbered 1 through 12
pub fn month_emoji(month: u32) -> Option<&'static str> {
    month_entry(month).map(|(_, emoji)| emoji)
}

fn month_entry(month: u32) -> Option<(&'static str, &'static str)> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS.get(index).copied()
}

/// Half of the day an hour falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    /// Hours 0 through 11
    Am,
    /// Hours 12 through 23
    Pm,
}

impl Meridiem {
    /// Classify a 24-hour clock hour
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Am
        } else {
            Self::Pm
        }
    }
}

/// Final mapping printed at the end of a run
///
/// Field order is the serialization order. `AM` and `PM` are mutually
/// exclusive once [`TimeReport::set_meridiem`] has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeReport {
    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS[.ffffff]+HH:MM`
    pub current_time: String,
    /// Requested IANA timezone name
    pub timezone: String,
    /// UTC offset such as `-04:00`
    pub utc_offset: String,
    /// Month name
    pub month_name: String,
    /// Emoji for the month
    pub month_emoji: String,
    /// True before noon
    #[serde(rename = "AM")]
    pub am: bool,
    /// True from noon onwards
    #[serde(rename = "PM")]
    pub pm: bool,
}

impl TimeReport {
    /// Build a report entirely from a timezone-aware datetime
    ///
    /// # Examples
    ///
    /// ```
    /// use time_agent::timekeeping::{parse_model_datetime, TimeReport};
    ///
    /// let dt = parse_model_datetime("2025-12-24T18:30:00+01:00").unwrap();
    /// let report = TimeReport::from_datetime(&dt, "Europe/Berlin");
    /// assert_eq!(report.month_name, "December");
    /// assert!(report.pm && !report.am);
    /// ```
    pub fn from_datetime<T>(dt: &DateTime<T>, timezone: &str) -> Self
    where
        T: TimeZone,
        T::Offset: std::fmt::Display,
    {
        let month = dt.month();
        let mut report = Self {
            current_time: render_datetime(dt),
            timezone: timezone.to_string(),
            utc_offset: offset_of(dt),
            month_name: month_name(month).unwrap_or_default().to_string(),
            month_emoji: month_emoji(month).unwrap_or_default().to_string(),
            am: false,
            pm: false,
        };
        report.set_meridiem(Meridiem::from_hour(dt.hour()));
        report
    }

    /// Mark the report as AM or PM
    pub fn set_meridiem(&mut self, meridiem: Meridiem) {
        self.am = meridiem == Meridiem::Am;
        self.pm = meridiem == Meridiem::Pm;
    }

    /// The meridiem currently recorded, if exactly one flag is set
    pub fn meridiem(&self) -> Option<Meridiem> {
        match (self.am, self.pm) {
            (true, false) => Some(Meridiem::Am),
            (false, true) => Some(Meridiem::Pm),
            _ => None,
        }
    }
}
