//! Nodes and router of the time workflow

use super::state::{AgentState, MonthNameOutput, TimeOutput};
use crate::agent::Agent;
use crate::config::{AgentConfig, TimeConfig};
use crate::error::Result;
use crate::providers::Provider;
use crate::timekeeping::{self, Meridiem, TimeReport};
use crate::tools::{get_time::TOOL_NAME, GetTimeTool, ToolRegistry};
use crate::workflow::Node;
use async_trait::async_trait;
use chrono::Timelike;
use std::sync::Arc;
use tracing::info;

pub const GET_TIME: &str = "get_time";
pub const GET_MONTH_NAME: &str = "get_month_name";
pub const FORMAT: &str = "format";
pub const IS_AM: &str = "is_AM";
pub const IS_PM: &str = "is_PM";

/// System prompt of the agent that calls the `get_time` tool
pub const TIME_AGENT_PROMPT: &str = "Use the `get_time` function to get the time. \
Return the current time as a datetime object, and return the UTC offset.";

/// System prompt of the agent that names the month
pub const MONTH_AGENT_PROMPT: &str =
    "Return the name of the month and also return an emoji that most represents that month.";

/// Asks the time agent for the current time in the state's timezone
///
/// The agent is assembled per run because the `get_time` tool is bound to
/// the timezone carried in the state.
pub struct GetTimeNode {
    provider: Arc<dyn Provider>,
    agent_config: AgentConfig,
    time_config: TimeConfig,
}

impl GetTimeNode {
    pub fn new(provider: Arc<dyn Provider>, agent_config: AgentConfig, time_config: TimeConfig) -> Self {
        Self {
            provider,
            agent_config,
            time_config,
        }
    }

    fn agent_for(&self, timezone: &str) -> Result<Agent> {
        let tz = timekeeping::parse_timezone(timezone)?;
        let mut tools = ToolRegistry::new();
        tools.register(
            TOOL_NAME,
            Arc::new(GetTimeTool::from_config(tz, &self.time_config)?),
        );

        Ok(Agent::new(Arc::clone(&self.provider), tools, self.agent_config.clone())?
            .with_system_prompt(TIME_AGENT_PROMPT))
    }
}

#[async_trait]
impl Node<AgentState> for GetTimeNode {
    async fn run(&self, mut state: AgentState) -> Result<AgentState> {
        let agent = self.agent_for(&state.timezone)?;
        let output: TimeOutput = agent.run_structured(state.get_time_prompt.as_str()).await?;
        info!("time agent output: {:?}", output);

        state.time_data = Some(output.time_data_output);
        state.utc_offset = Some(output.utc_offset_output);
        Ok(state)
    }
}

/// Asks the month agent to name the month of the time agent's datetime
pub struct MonthNameNode {
    agent: Agent,
}

impl MonthNameNode {
    pub fn new(provider: Arc<dyn Provider>, agent_config: AgentConfig) -> Result<Self> {
        let agent = Agent::new(provider, ToolRegistry::new(), agent_config)?
            .with_system_prompt(MONTH_AGENT_PROMPT);
        Ok(Self { agent })
    }
}

#[async_trait]
impl Node<AgentState> for MonthNameNode {
    async fn run(&self, mut state: AgentState) -> Result<AgentState> {
        let prompt = format!(
            "What month is it according to this datetime object?: {}",
            timekeeping::render_datetime(state.time_data()?)
        );
        let output: MonthNameOutput = self.agent.run_structured(prompt).await?;
        info!("month agent output: {:?}", output);

        state.month_name = Some(output.month_name_output);
        state.month_emoji = Some(output.month_name_output_emoji);
        Ok(state)
    }
}

/// Builds the final answer with both meridiem flags cleared
pub async fn format(mut state: AgentState) -> Result<AgentState> {
    let report = TimeReport {
        current_time: timekeeping::render_datetime(state.time_data()?),
        timezone: state.timezone.clone(),
        utc_offset: state.utc_offset()?.to_string(),
        month_name: state.month_name()?.to_string(),
        month_emoji: state.month_emoji()?.to_string(),
        am: false,
        pm: false,
    };
    state.final_answer = Some(report);
    Ok(state)
}

/// Marks the final answer as AM
pub async fn add_am(mut state: AgentState) -> Result<AgentState> {
    state.final_answer_mut()?.set_meridiem(Meridiem::Am);
    Ok(state)
}

/// Marks the final answer as PM
pub async fn add_pm(mut state: AgentState) -> Result<AgentState> {
    state.final_answer_mut()?.set_meridiem(Meridiem::Pm);
    Ok(state)
}

/// Routes to `is_AM` or `is_PM` from the hour of the model's datetime
///
/// The hour is read in the datetime's own offset, not converted to the
/// requested timezone.
pub fn is_am_or_pm(state: &AgentState) -> Result<&'static str> {
    Ok(match Meridiem::from_hour(state.time_data()?.hour()) {
        Meridiem::Am => IS_AM,
        Meridiem::Pm => IS_PM,
    })
}
