//! The task graph and its scheduler.

use pliant_types::{PliantError, PliantResult};
use rayon::prelude::*;
use tracing::debug;

/// Handle to a node in a [`TaskGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A named synchronous unit of per-step work.
pub struct TaskNode {
    name: String,
    func: Box<dyn FnMut() + Send>,
}

impl TaskNode {
    pub fn new(name: impl Into<String>, func: impl FnMut() + Send + 'static) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TaskNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskNode").field("name", &self.name).finish()
    }
}

/// A static dependency graph of task nodes.
///
/// Edges are wired once during scene setup. [`execute`](Self::execute)
/// validates the graph (cycles, dangling edges) on first use and caches
/// the dependency levels until the graph is mutated again.
#[derive(Debug, Default)]
pub struct TaskGraph {
    nodes: Vec<TaskNode>,
    edges: Vec<(usize, usize)>,
    /// Nodes grouped by dependency depth; level N only depends on
    /// levels < N. Rebuilt lazily after mutation.
    levels: Option<Vec<Vec<usize>>>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its handle.
    pub fn add_node(&mut self, node: TaskNode) -> NodeId {
        self.levels = None;
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Shorthand for adding a closure node.
    pub fn add_task(&mut self, name: impl Into<String>, func: impl FnMut() + Send + 'static) -> NodeId {
        self.add_node(TaskNode::new(name, func))
    }

    /// Add a dependency edge: `to` runs after `from`.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> PliantResult<()> {
        let n = self.nodes.len();
        if from.0 >= n || to.0 >= n {
            return Err(PliantError::InvalidGraph(format!(
                "edge ({}, {}) references a missing node ({n} nodes)",
                from.0, to.0
            )));
        }
        if from == to {
            return Err(PliantError::InvalidGraph(format!(
                "self edge on node '{}'",
                self.nodes[from.0].name()
            )));
        }
        self.levels = None;
        self.edges.push((from.0, to.0));
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Group nodes into dependency levels (Kahn's algorithm).
    ///
    /// Fails with [`PliantError::InvalidGraph`] if the graph has a cycle.
    fn build_levels(&self) -> PliantResult<Vec<Vec<usize>>> {
        let n = self.nodes.len();
        let mut in_degree = vec![0usize; n];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for &(from, to) in &self.edges {
            in_degree[to] += 1;
            successors[from].push(to);
        }

        let mut current: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut levels = Vec::new();
        let mut visited = 0;
        while !current.is_empty() {
            visited += current.len();
            let mut next = Vec::new();
            for &node in &current {
                for &succ in &successors[node] {
                    in_degree[succ] -= 1;
                    if in_degree[succ] == 0 {
                        next.push(succ);
                    }
                }
            }
            levels.push(std::mem::replace(&mut current, next));
        }

        if visited != n {
            let stuck: Vec<&str> = (0..n)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| self.nodes[i].name())
                .collect();
            return Err(PliantError::InvalidGraph(format!(
                "cycle involving nodes: {}",
                stuck.join(", ")
            )));
        }
        Ok(levels)
    }

    /// Run every node once, respecting the dependency edges.
    ///
    /// Nodes within a level run on the rayon pool; levels run in order.
    pub fn execute(&mut self) -> PliantResult<()> {
        if self.levels.is_none() {
            let levels = self.build_levels()?;
            debug!(
                nodes = self.nodes.len(),
                levels = levels.len(),
                "validated task graph"
            );
            self.levels = Some(levels);
        }
        let levels = self.levels.clone().unwrap_or_default();

        for level in &levels {
            if level.len() == 1 {
                (self.nodes[level[0]].func)();
                continue;
            }
            self.nodes
                .par_iter_mut()
                .enumerate()
                .filter(|(i, _)| level.contains(i))
                .for_each(|(_, node)| (node.func)());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnMut() + Send>) {
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let log2 = log.clone();
        let make = move |tag: &'static str| -> Box<dyn FnMut() + Send> {
            let log = log2.clone();
            Box::new(move || log.lock().unwrap().push(tag))
        };
        (log, make)
    }

    #[test]
    fn executes_in_dependency_order() {
        let (log, make) = recorder();
        let mut graph = TaskGraph::new();
        let predict = graph.add_task("predict", make("predict"));
        let solve = graph.add_task("solve", make("solve"));
        let update = graph.add_task("update", make("update"));
        graph.add_edge(predict, solve).unwrap();
        graph.add_edge(solve, update).unwrap();
        graph.execute().unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["predict", "solve", "update"]);
    }

    #[test]
    fn independent_nodes_all_run() {
        let (log, make) = recorder();
        let mut graph = TaskGraph::new();
        for tag in ["a", "b", "c", "d"] {
            graph.add_task(tag, make(tag));
        }
        graph.execute().unwrap();
        let mut ran = log.lock().unwrap().clone();
        ran.sort_unstable();
        assert_eq!(ran, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn cycle_is_detected() {
        let mut graph = TaskGraph::new();
        let a = graph.add_task("a", || {});
        let b = graph.add_task("b", || {});
        graph.add_edge(a, b).unwrap();
        graph.add_edge(b, a).unwrap();
        assert!(graph.execute().is_err());
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let mut graph = TaskGraph::new();
        let a = graph.add_task("a", || {});
        assert!(graph.add_edge(a, NodeId(7)).is_err());
        assert!(graph.add_edge(a, a).is_err());
    }

    #[test]
    fn repeated_execution_reuses_the_graph() {
        let (log, make) = recorder();
        let mut graph = TaskGraph::new();
        graph.add_task("tick", make("tick"));
        graph.execute().unwrap();
        graph.execute().unwrap();
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
