//! The seam between the staging coordinator and whatever schedules steps.
//!
//! The coordinator only ever calls [`TaskGraphAdapter::add_dependency`]. Two adapters are
//! provided: [`DependencyRecorder`], which just records calls, and [`ExecutionGraph`], which
//! builds a directed graph that can be ordered for execution.

use crate::error::{StagingError, StagingResult};
use crate::identifier::StepId;
use parking_lot::RwLock;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use ptree::{IndentChars, PrintConfig};
use std::collections::HashMap;
use std::sync::Arc;

/// A host facility that schedules steps. Only ordering constraints are ever declared to it.
pub trait TaskGraphAdapter {
    /// Declares that `consumer` must not run until `producer` has completed.
    fn add_dependency(&mut self, consumer: &StepId, producer: &StepId);
}

assert_obj_safe!(TaskGraphAdapter);

impl<A: TaskGraphAdapter + ?Sized> TaskGraphAdapter for &mut A {
    fn add_dependency(&mut self, consumer: &StepId, producer: &StepId) {
        (**self).add_dependency(consumer, producer)
    }
}

impl<A: TaskGraphAdapter + ?Sized> TaskGraphAdapter for Box<A> {
    fn add_dependency(&mut self, consumer: &StepId, producer: &StepId) {
        (**self).add_dependency(consumer, producer)
    }
}

/// Records every `add_dependency` call, in order.
#[derive(Debug, Default, Clone)]
pub struct DependencyRecorder {
    calls: Vec<(StepId, StepId)>,
}

impl DependencyRecorder {
    pub fn calls(&self) -> &[(StepId, StepId)] {
        &self.calls
    }

    /// The recorded calls as plain strings
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .map(|(consumer, producer)| (consumer.to_string(), producer.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl TaskGraphAdapter for DependencyRecorder {
    fn add_dependency(&mut self, consumer: &StepId, producer: &StepId) {
        self.calls.push((consumer.clone(), producer.clone()));
    }
}

/// The kind of edge stored in an [`ExecutionGraph`]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum EdgeKind {
    DependsOn,
}

/// An in-memory execution graph.
///
/// Edges point from a step to the steps it depends on. Adding the same dependency twice only
/// stores it once.
#[derive(Debug, Clone, Default)]
pub struct ExecutionGraph {
    inner: Arc<RwLock<GraphInner>>,
}

#[derive(Debug, Default)]
struct GraphInner {
    graph: DiGraph<StepId, EdgeKind>,
    nodes: HashMap<StepId, NodeIndex>,
}

impl GraphInner {
    fn node(&mut self, id: &StepId) -> NodeIndex {
        if let Some(index) = self.nodes.get(id) {
            return *index;
        }
        let index = self.graph.add_node(id.clone());
        self.nodes.insert(id.clone(), index);
        index
    }
}

impl ExecutionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.read().graph.edge_count()
    }

    /// The steps `step` directly depends on
    pub fn dependencies_of(&self, step: &str) -> Vec<StepId> {
        let inner = self.inner.read();
        let index = match inner.nodes.get(step) {
            Some(&index) => index,
            None => return vec![],
        };
        let mut dependencies: Vec<StepId> = inner
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .map(|n| inner.graph[n].clone())
            .collect();
        dependencies.sort();
        dependencies
    }

    /// Orders every step so that each one comes after all of its dependencies.
    ///
    /// # Error
    /// Fails with [`StagingError::CycleDetected`] if the host added a cycle.
    pub fn execution_order(&self) -> StagingResult<Vec<StepId>> {
        let inner = self.inner.read();
        let sorted = toposort(&inner.graph, None)
            .map_err(|cycle| StagingError::CycleDetected(inner.graph[cycle.node_id()].clone()))?;
        Ok(sorted
            .into_iter()
            .rev()
            .map(|index| inner.graph[index].clone())
            .collect())
    }

    /// Steps that nothing else depends on
    pub fn roots(&self) -> Vec<StepId> {
        let inner = self.inner.read();
        inner
            .graph
            .node_indices()
            .filter(|&index| {
                inner
                    .graph
                    .neighbors_directed(index, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|index| inner.graph[index].clone())
            .collect()
    }

    /// Renders the dependencies of `root` as a tree
    pub fn render_tree(&self, root: &str) -> Option<String> {
        let inner = self.inner.read();
        let &index = inner.nodes.get(root)?;
        let mut buffer = Vec::new();
        ptree::graph::write_graph_with(&inner.graph, index, &mut buffer, &print_config()).ok()?;
        String::from_utf8(buffer).ok()
    }
}

impl TaskGraphAdapter for ExecutionGraph {
    fn add_dependency(&mut self, consumer: &StepId, producer: &StepId) {
        let mut inner = self.inner.write();
        let from = inner.node(consumer);
        let to = inner.node(producer);
        if inner.graph.find_edge(from, to).is_none() {
            inner.graph.add_edge(from, to, EdgeKind::DependsOn);
        }
    }
}

/// Creates the print config used for dependency trees
fn print_config() -> PrintConfig {
    let mut config = PrintConfig::default();
    config.indent = 4;
    config.characters = IndentChars {
        down_and_right: "+".to_string(),
        down: "|".to_string(),
        turn_right: "\\".to_string(),
        right: "-".to_string(),
        empty: " ".to_string(),
    };
    config
}
