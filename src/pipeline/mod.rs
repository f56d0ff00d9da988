//! The time workflow
//!
//! Wires the time agent, the month agent and the AM/PM enrichment into one
//! compiled graph:
//!
//! ```text
//! START -> get_time -> get_month_name -> format -> (is_AM | is_PM) -> END
//! ```

pub mod nodes;
pub mod state;

pub use nodes::{is_am_or_pm, GetTimeNode, MonthNameNode};
pub use state::{AgentState, MonthNameOutput, TimeOutput};

use crate::config::Config;
use crate::error::Result;
use crate::providers::Provider;
use crate::timekeeping::{self, TimeReport};
use crate::workflow::{from_fn, CompiledGraph, StateGraph, END, START};
use std::sync::Arc;
use tracing::info;

/// The compiled time workflow, reusable across runs
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use time_agent::config::Config;
/// use time_agent::pipeline::TimePipeline;
/// use time_agent::providers::create_provider;
///
/// # async fn example() -> time_agent::error::Result<()> {
/// let config = Config::default();
/// let provider = create_provider(&config.provider)?;
/// let pipeline = TimePipeline::new(provider, &config)?;
/// let report = pipeline.run("Asia/Seoul", "What is the current time?").await?;
/// println!("{}", serde_json::to_string_pretty(&report)?);
/// # Ok(())
/// # }
/// ```
pub struct TimePipeline {
    graph: CompiledGraph<AgentState>,
}

impl TimePipeline {
    /// Build both agents and compile the workflow graph
    ///
    /// # Errors
    ///
    /// Returns error if an agent cannot be created from the configuration or
    /// the graph fails validation
    pub fn new(provider: Arc<dyn Provider>, config: &Config) -> Result<Self> {
        let mut graph = StateGraph::new();
        graph
            .add_node(
                nodes::GET_TIME,
                GetTimeNode::new(
                    Arc::clone(&provider),
                    config.agent.clone(),
                    config.time.clone(),
                ),
            )
            .add_node(
                nodes::GET_MONTH_NAME,
                MonthNameNode::new(provider, config.agent.clone())?,
            )
            .add_node(nodes::FORMAT, from_fn(nodes::format))
            .add_node(nodes::IS_AM, from_fn(nodes::add_am))
            .add_node(nodes::IS_PM, from_fn(nodes::add_pm))
            .add_edge(START, nodes::GET_TIME)
            .add_edge(nodes::GET_TIME, nodes::GET_MONTH_NAME)
            .add_edge(nodes::GET_MONTH_NAME, nodes::FORMAT)
            .add_conditional_edges(nodes::FORMAT, is_am_or_pm, &[nodes::IS_AM, nodes::IS_PM])
            .add_edge(nodes::IS_AM, END)
            .add_edge(nodes::IS_PM, END);

        Ok(Self {
            graph: graph.compile()?,
        })
    }

    /// Run the workflow for a timezone and return the final answer
    ///
    /// The timezone is validated before any model call is made.
    ///
    /// # Errors
    ///
    /// Returns `TimeAgentError::InvalidTimezone` for unknown timezones, and
    /// any agent, tool or workflow error raised along the way
    pub async fn run(&self, timezone: &str, prompt: &str) -> Result<TimeReport> {
        let tz = timekeeping::parse_timezone(timezone)?;
        info!(timezone = %tz.name(), "Starting time workflow");

        let state = self.graph.invoke(AgentState::new(prompt, tz.name())).await?;
        state
            .final_answer
            .ok_or_else(|| crate::error::TimeAgentError::MissingState("final_answer").into())
    }
}
