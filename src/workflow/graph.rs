//! State graph construction, validation and execution

use crate::error::{Result, TimeAgentError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the virtual entry node
pub const START: &str = "__start__";

/// Name of the virtual exit node
pub const END: &str = "__end__";

/// Maximum number of node executions in one invocation unless overridden
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// A unit of work that takes the workflow state and returns the updated state
#[async_trait]
pub trait Node<S>: Send + Sync {
    /// Run the node
    async fn run(&self, state: S) -> Result<S>;
}

/// Node backed by an async function
///
/// # Examples
///
/// ```
/// use time_agent::workflow::{from_fn, Node};
///
/// # tokio_test::block_on(async {
/// let double = from_fn(|n: u32| async move { Ok::<_, anyhow::Error>(n * 2) });
/// assert_eq!(double.run(21).await.unwrap(), 42);
/// # });
/// ```
pub struct FnNode<F> {
    func: F,
}

/// Wrap an async function as a [`Node`]
pub fn from_fn<F>(func: F) -> FnNode<F> {
    FnNode { func }
}

#[async_trait]
impl<S, F, Fut> Node<S> for FnNode<F>
where
    S: Send + 'static,
    F: Fn(S) -> Fut + Send + Sync,
    Fut: Future<Output = Result<S>> + Send,
{
    async fn run(&self, state: S) -> Result<S> {
        (self.func)(state).await
    }
}

type Router<S> = Arc<dyn Fn(&S) -> Result<String> + Send + Sync>;

enum Route<S> {
    Direct(String),
    Conditional { router: Router<S>, targets: Vec<String> },
}

impl<S> Clone for Route<S> {
    fn clone(&self) -> Self {
        match self {
            Route::Direct(target) => Route::Direct(target.clone()),
            Route::Conditional { router, targets } => Route::Conditional {
                router: Arc::clone(router),
                targets: targets.clone(),
            },
        }
    }
}

impl<S> fmt::Debug for Route<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Direct(target) => write!(f, "-> {}", target),
            Route::Conditional { targets, .. } => write!(f, "-> one of {:?}", targets),
        }
    }
}

/// Builder for a workflow graph over state type `S`
///
/// Mistakes made while building (duplicate nodes, a second route out of the
/// same node) are collected and reported by [`StateGraph::compile`].
///
/// # Examples
///
/// ```
/// use time_agent::workflow::{from_fn, StateGraph, END, START};
///
/// # tokio_test::block_on(async {
/// let mut graph = StateGraph::new();
/// graph
///     .add_node("increment", from_fn(|n: i32| async move { Ok::<_, anyhow::Error>(n + 1) }))
///     .add_edge(START, "increment")
///     .add_edge("increment", END);
///
/// let compiled = graph.compile().unwrap();
/// assert_eq!(compiled.invoke(1).await.unwrap(), 2);
/// # });
/// ```
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    routes: HashMap<String, Route<S>>,
    problems: Vec<String>,
}

impl<S: Send + 'static> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send + 'static> StateGraph<S> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            routes: HashMap::new(),
            problems: Vec::new(),
        }
    }

    /// Add a named node
    pub fn add_node(&mut self, name: impl Into<String>, node: impl Node<S> + 'static) -> &mut Self {
        let name = name.into();
        if name == START || name == END {
            self.problems
                .push(format!("'{}' is a reserved node name", name));
        } else if self.nodes.contains_key(&name) {
            self.problems.push(format!("Node '{}' is already present", name));
        } else {
            self.nodes.insert(name, Arc::new(node));
        }
        self
    }

    /// Add an unconditional edge
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        let from = from.into();
        self.set_route(from, Route::Direct(to.into()));
        self
    }

    /// Add a routing function deciding which of `targets` follows `from`
    ///
    /// The router sees the state produced by `from` and must name one of
    /// `targets`.
    pub fn add_conditional_edges<F, R>(
        &mut self,
        from: impl Into<String>,
        router: F,
        targets: &[&str],
    ) -> &mut Self
    where
        F: Fn(&S) -> Result<R> + Send + Sync + 'static,
        R: Into<String>,
    {
        let router: Router<S> = Arc::new(move |state: &S| router(state).map(Into::into));
        self.set_route(
            from.into(),
            Route::Conditional {
                router,
                targets: targets.iter().map(|t| t.to_string()).collect(),
            },
        );
        self
    }

    fn set_route(&mut self, from: String, route: Route<S>) {
        if from == END {
            self.problems.push("END cannot have outgoing edges".to_string());
        } else if self.routes.contains_key(&from) {
            self.problems
                .push(format!("Node '{}' already has an outgoing route", from));
        } else {
            self.routes.insert(from, route);
        }
    }

    /// Validate the graph and freeze it for execution
    ///
    /// # Errors
    ///
    /// Returns `TimeAgentError::Workflow` when the graph has no entry edge,
    /// an edge refers to an unknown node, a node has no outgoing route, a
    /// conditional edge has no targets, or a building mistake was recorded.
    pub fn compile(self) -> Result<CompiledGraph<S>> {
        if let Some(problem) = self.problems.first() {
            return Err(TimeAgentError::Workflow(problem.clone()).into());
        }

        if !self.routes.contains_key(START) {
            return Err(TimeAgentError::Workflow(
                "Graph has no edge from START".to_string(),
            )
            .into());
        }

        let is_target = |name: &str| name == END || self.nodes.contains_key(name);

        for (from, route) in &self.routes {
            if from != START && !self.nodes.contains_key(from) {
                return Err(TimeAgentError::Workflow(format!(
                    "Edge starts at unknown node '{}'",
                    from
                ))
                .into());
            }

            let targets: Vec<&String> = match route {
                Route::Direct(target) => vec![target],
                Route::Conditional { targets, .. } if targets.is_empty() => {
                    return Err(TimeAgentError::Workflow(format!(
                        "Conditional edge from '{}' has no targets",
                        from
                    ))
                    .into());
                }
                Route::Conditional { targets, .. } => targets.iter().collect(),
            };

            if let Some(unknown) = targets.into_iter().find(|t| !is_target(t.as_str())) {
                return Err(TimeAgentError::Workflow(format!(
                    "Edge from '{}' points to unknown node '{}'",
                    from, unknown
                ))
                .into());
            }
        }

        let mut dangling: Vec<&String> = self
            .nodes
            .keys()
            .filter(|name| !self.routes.contains_key(*name))
            .collect();
        dangling.sort();
        if let Some(name) = dangling.first() {
            return Err(TimeAgentError::Workflow(format!(
                "Node '{}' has no outgoing edge",
                name
            ))
            .into());
        }

        debug!("Compiled graph: {:?}", self.routes);

        Ok(CompiledGraph {
            nodes: self.nodes,
            routes: self.routes,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        })
    }
}

/// A validated graph ready to run
pub struct CompiledGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    routes: HashMap<String, Route<S>>,
    recursion_limit: usize,
}

impl<S: Send + 'static> CompiledGraph<S> {
    /// Override the maximum number of node executions per invocation
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Names of the nodes in the graph, sorted
    pub fn node_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the graph from START until END is reached
    ///
    /// # Errors
    ///
    /// Returns any error raised by a node or router, or
    /// `TimeAgentError::Workflow` if a router names an undeclared target or
    /// the recursion limit is hit.
    pub async fn invoke(&self, state: S) -> Result<S> {
        let mut state = state;
        let mut current = self.next_node(START, &state)?;
        let mut steps = 0;

        while current != END {
            steps += 1;
            if steps > self.recursion_limit {
                return Err(TimeAgentError::Workflow(format!(
                    "Recursion limit of {} reached without hitting END",
                    self.recursion_limit
                ))
                .into());
            }

            let node = self.nodes.get(&current).ok_or_else(|| {
                TimeAgentError::Workflow(format!("Unknown node '{}'", current))
            })?;

            info!(node = %current, step = steps, "Running workflow node");
            state = node.run(state).await?;
            current = self.next_node(&current, &state)?;
        }

        debug!("Workflow reached END after {} steps", steps);
        Ok(state)
    }

    fn next_node(&self, from: &str, state: &S) -> Result<String> {
        match self.routes.get(from) {
            Some(Route::Direct(target)) => Ok(target.clone()),
            Some(Route::Conditional { router, targets }) => {
                let target = router(state)?;
                if targets.contains(&target) {
                    debug!("Router after '{}' chose '{}'", from, target);
                    Ok(target)
                } else {
                    Err(TimeAgentError::Workflow(format!(
                        "Router after '{}' returned undeclared target '{}'",
                        from, target
                    ))
                    .into())
                }
            }
            None => Err(TimeAgentError::Workflow(format!(
                "Node '{}' has no outgoing edge",
                from
            ))
            .into()),
        }
    }
}
