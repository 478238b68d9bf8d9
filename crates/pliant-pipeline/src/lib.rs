//! # pliant-pipeline
//!
//! A cooperative task graph for the per-step simulation pipeline.
//!
//! Nodes are synchronous callables; edges are data dependencies wired
//! once at scene initialization, not re-derived per frame. Execution
//! visits nodes in topological order; nodes in the same dependency
//! level have no path between them and may run on worker threads.

pub mod graph;

pub use graph::{NodeId, TaskGraph, TaskNode};
