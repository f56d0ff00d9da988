//! Workflow state and the structured outputs requested from the model

use crate::error::{Result, TimeAgentError};
use crate::timekeeping::{self, TimeReport};
use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer};

/// State threaded through the time workflow
///
/// Optional fields are filled in node order. The accessors fail with
/// `TimeAgentError::MissingState` when a node reads a field before the node
/// responsible for it has run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    /// Prompt handed to the time agent
    pub get_time_prompt: String,
    /// IANA timezone the `get_time` tool reports in
    pub timezone: String,
    /// Datetime returned by the time agent
    pub time_data: Option<DateTime<FixedOffset>>,
    /// UTC offset returned by the time agent
    pub utc_offset: Option<String>,
    /// Month name returned by the month agent
    pub month_name: Option<String>,
    /// Month emoji returned by the month agent
    pub month_emoji: Option<String>,
    /// Final mapping built by the `format` node
    pub final_answer: Option<TimeReport>,
}

impl AgentState {
    /// Initial state for one run
    pub fn new(get_time_prompt: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            get_time_prompt: get_time_prompt.into(),
            timezone: timezone.into(),
            time_data: None,
            utc_offset: None,
            month_name: None,
            month_emoji: None,
            final_answer: None,
        }
    }

    /// The datetime returned by the time agent
    pub fn time_data(&self) -> Result<&DateTime<FixedOffset>> {
        self.time_data
            .as_ref()
            .ok_or_else(|| TimeAgentError::MissingState("time_data").into())
    }

    /// The UTC offset returned by the time agent
    pub fn utc_offset(&self) -> Result<&str> {
        required(&self.utc_offset, "utc_offset")
    }

    /// The month name returned by the month agent
    pub fn month_name(&self) -> Result<&str> {
        required(&self.month_name, "month_name")
    }

    /// The month emoji returned by the month agent
    pub fn month_emoji(&self) -> Result<&str> {
        required(&self.month_emoji, "month_emoji")
    }

    /// Mutable access to the final answer built by `format`
    pub fn final_answer_mut(&mut self) -> Result<&mut TimeReport> {
        self.final_answer
            .as_mut()
            .ok_or_else(|| TimeAgentError::MissingState("final_answer").into())
    }
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    field
        .as_deref()
        .ok_or_else(|| TimeAgentError::MissingState(name).into())
}

/// Structured answer of the time agent
///
/// `time_data_output` is parsed while the answer is deserialized, so a
/// datetime without an offset is rejected like any other malformed answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct TimeOutput {
    /// The current time as an ISO 8601 datetime including its UTC offset,
    /// exactly as returned by the `get_time` function
    #[serde(deserialize_with = "deserialize_model_datetime")]
    #[schemars(with = "String")]
    pub time_data_output: DateTime<FixedOffset>,
    /// The UTC offset of that datetime, formatted like `-04:00`
    pub utc_offset_output: String,
}

fn deserialize_model_datetime<'de, D>(
    deserializer: D,
) -> std::result::Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    timekeeping::parse_model_datetime(&text).map_err(de::Error::custom)
}

/// Structured answer of the month agent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct MonthNameOutput {
    /// English name of the month
    pub month_name_output: String,
    /// A single emoji that most represents the month
    pub month_name_output_emoji: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_only_inputs() {
        let state = AgentState::new("What is the current time?", "Asia/Seoul");
        assert_eq!(state.timezone, "Asia/Seoul");
        assert!(state.time_data.is_none());
        assert!(state.final_answer.is_none());
    }

    #[test]
    fn test_missing_fields_are_reported_by_name() {
        let mut state = AgentState::new("prompt", "UTC");
        let err = state.month_name().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TimeAgentError>(),
            Some(TimeAgentError::MissingState("month_name"))
        ));
        assert!(state.time_data().is_err());
        assert!(state.final_answer_mut().is_err());
    }

    #[test]
    fn test_time_output_schema_lists_both_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(TimeOutput)).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("time_data_output")));
        assert!(required.contains(&serde_json::json!("utc_offset_output")));
    }

    #[test]
    fn test_time_output_parses_datetime() {
        let output: TimeOutput = serde_json::from_str(
            r#"{"time_data_output": "2025-10-19 21:15:42.123456-04:00", "utc_offset_output": "-04:00"}"#,
        )
        .unwrap();
        assert_eq!(output.time_data_output.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(output.utc_offset_output, "-04:00");
    }

    #[test]
    fn test_time_output_rejects_datetime_without_offset() {
        let err = serde_json::from_str::<TimeOutput>(
            r#"{"time_data_output": "2025-10-19T21:15:42", "utc_offset_output": "-04:00"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid datetime"));
    }

    #[test]
    fn test_time_output_schema_declares_string_datetime() {
        let schema = serde_json::to_value(schemars::schema_for!(TimeOutput)).unwrap();
        assert_eq!(schema["properties"]["time_data_output"]["type"], "string");
    }

    #[test]
    fn test_month_output_deserializes() {
        let output: MonthNameOutput = serde_json::from_str(
            r#"{"month_name_output": "October", "month_name_output_emoji": "🎃"}"#,
        )
        .unwrap();
        assert_eq!(output.month_name_output, "October");
        assert_eq!(output.month_name_output_emoji, "🎃");
    }
}
