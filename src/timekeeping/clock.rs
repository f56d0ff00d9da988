//! Clock access, timezone resolution and datetime parsing

use crate::error::{Result, TimeAgentError};
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Layouts accepted for model-produced datetimes, tried after RFC 3339
const MODEL_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Resolve an IANA timezone name
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `TimeAgentError::InvalidTimezone` if the name is unknown
///
/// # Examples
///
/// ```
/// use time_agent::timekeeping::parse_timezone;
///
/// let tz = parse_timezone(" America/New_York ").unwrap();
/// assert_eq!(tz.name(), "America/New_York");
/// assert!(parse_timezone("Mars/Olympus_Mons").is_err());
/// ```
pub fn parse_timezone(name: &str) -> Result<Tz> {
    let trimmed = name.trim();
    Tz::from_str(trimmed).map_err(|_| {
        TimeAgentError::InvalidTimezone {
            timezone: trimmed.to_string(),
        }
        .into()
    })
}

/// Detect the system timezone, falling back to UTC
pub fn local_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(tz_name) => match tz_name.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!("Could not parse timezone '{}', defaulting to UTC", tz_name);
                chrono_tz::UTC
            }
        },
        Err(_) => {
            tracing::warn!("Could not detect system timezone, defaulting to UTC");
            chrono_tz::UTC
        }
    }
}

/// Current instant in the given timezone
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Parse a datetime returned by a model or a time API
///
/// Accepts RFC 3339 (`2025-10-19T14:03:12.5-04:00`) and the space separated
/// form (`2025-10-19 14:03:12-04:00`). A UTC offset is mandatory.
///
/// # Errors
///
/// Returns `TimeAgentError::InvalidDateTime` when no layout matches
///
/// # Examples
///
/// ```
/// use chrono::Timelike;
/// use time_agent::timekeeping::parse_model_datetime;
///
/// let dt = parse_model_datetime("2025-10-19 14:03:12-04:00").unwrap();
/// assert_eq!(dt.hour(), 14);
/// assert!(parse_model_datetime("2025-10-19 14:03:12").is_err());
/// ```
pub fn parse_model_datetime(text: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }

    MODEL_DATETIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            TimeAgentError::InvalidDateTime {
                value: trimmed.to_string(),
            }
            .into()
        })
}

/// Format a UTC offset given in seconds as `+HH:MM`
///
/// # Examples
///
/// ```
/// use time_agent::timekeeping::format_offset;
///
/// assert_eq!(format_offset(-4 * 3600), "-04:00");
/// assert_eq!(format_offset(5 * 3600 + 45 * 60), "+05:45");
/// ```
pub fn format_offset(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let total_minutes = offset_seconds.unsigned_abs() / 60;
    format!("{}{:02}:{:02}", sign, total_minutes / 60, total_minutes % 60)
}

/// UTC offset of a datetime as `+HH:MM`
pub fn offset_of<T: TimeZone>(dt: &DateTime<T>) -> String {
    format_offset(dt.offset().fix().local_minus_utc())
}

/// Render a datetime as `YYYY-MM-DD HH:MM:SS[.ffffff]+HH:MM`
///
/// Fractional seconds are printed with microsecond precision and omitted
/// entirely when zero.
///
/// # Examples
///
/// ```
/// use time_agent::timekeeping::{parse_model_datetime, render_datetime};
///
/// let dt = parse_model_datetime("2025-10-19T09:05:00+09:00").unwrap();
/// assert_eq!(render_datetime(&dt), "2025-10-19 09:05:00+09:00");
/// ```
pub fn render_datetime<T>(dt: &DateTime<T>) -> String
where
    T: TimeZone,
    T::Offset: std::fmt::Display,
{
    let base = dt.format("%Y-%m-%d %H:%M:%S").to_string();
    let micros = dt.nanosecond() % 1_000_000_000 / 1_000;
    let offset = offset_of(dt);

    if micros == 0 {
        format!("{}{}", base, offset)
    } else {
        format!("{}.{:06}{}", base, micros, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    #[test]
    fn test_parse_timezone_valid() {
        let tz = parse_timezone("Asia/Seoul").unwrap();
        assert_eq!(tz, chrono_tz::Asia::Seoul);
    }

    #[test]
    fn test_parse_timezone_trims_whitespace() {
        let tz = parse_timezone("   Africa/Cairo   ").unwrap();
        assert_eq!(tz, chrono_tz::Africa::Cairo);
    }

    #[test]
    fn test_parse_timezone_invalid() {
        let err = parse_timezone("Invalid/Zone").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TimeAgentError>(),
            Some(TimeAgentError::InvalidTimezone { timezone }) if timezone == "Invalid/Zone"
        ));
    }

    #[test]
    fn test_parse_timezone_empty() {
        assert!(parse_timezone("").is_err());
    }

    #[test]
    fn test_now_in_uses_requested_zone() {
        let now = now_in(chrono_tz::Asia::Kolkata);
        assert_eq!(offset_of(&now), "+05:30");
    }

    #[test]
    fn test_parse_model_datetime_rfc3339() {
        let dt = parse_model_datetime("2025-10-19T14:03:12.123456-04:00").unwrap();
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_parse_model_datetime_zulu() {
        let dt = parse_model_datetime("2025-01-02T03:04:05Z").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.day(), 2);
    }

    #[test]
    fn test_parse_model_datetime_space_separated() {
        let dt = parse_model_datetime("2025-10-19 23:59:59.5+09:00").unwrap();
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_parse_model_datetime_compact_offset() {
        let dt = parse_model_datetime("2025-10-19T08:00:00-0330").unwrap();
        assert_eq!(offset_of(&dt), "-03:30");
    }

    #[test]
    fn test_parse_model_datetime_requires_offset() {
        let err = parse_model_datetime("2025-10-19T14:03:12").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TimeAgentError>(),
            Some(TimeAgentError::InvalidDateTime { .. })
        ));
    }

    #[test]
    fn test_parse_model_datetime_garbage() {
        assert!(parse_model_datetime("half past noon").is_err());
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(0), "+00:00");
        assert_eq!(format_offset(-5 * 3600), "-05:00");
        assert_eq!(format_offset(-(3 * 3600 + 30 * 60)), "-03:30");
        assert_eq!(format_offset(5 * 3600 + 45 * 60), "+05:45");
        assert_eq!(format_offset(14 * 3600), "+14:00");
    }

    #[test]
    fn test_render_datetime_without_fraction() {
        let dt = chrono_tz::America::New_York
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2025, 7, 4)
                    .unwrap()
                    .and_hms_opt(9, 30, 0)
                    .unwrap(),
            )
            .single()
            .unwrap();
        assert_eq!(render_datetime(&dt), "2025-07-04 09:30:00-04:00");
    }

    #[test]
    fn test_render_datetime_with_fraction() {
        let dt = parse_model_datetime("2025-10-19T14:03:12.026490-04:00").unwrap();
        assert_eq!(render_datetime(&dt), "2025-10-19 14:03:12.026490-04:00");
    }
}
