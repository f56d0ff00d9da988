//! Workflow graphs for time-agent
//!
//! A small state graph: named async nodes that transform a state value,
//! direct and conditional edges between them, and an executor that walks
//! the graph from [`START`] to [`END`].

pub mod graph;

pub use graph::{
    from_fn, CompiledGraph, FnNode, Node, StateGraph, DEFAULT_RECURSION_LIMIT, END, START,
};
