//! Evaluation order constraint
//!
//! One designated module is configured before every other module. The
//! constraint is kept as a dependency graph so any proposed build sequence
//! can be checked against it.

use crate::module::{ModuleName, ProjectTree};
use outdir_core::error::{Error, ErrorCode, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::BTreeSet;

/// Modules and the "configure before" edges between them
#[derive(Debug, Clone)]
pub struct EvaluationOrder {
    graph: DiGraph<ModuleName, ()>,
    first: NodeIndex,
    sequence: Vec<ModuleName>,
}

impl EvaluationOrder {
    /// Declare that every subproject of `tree` depends on `first` having
    /// been configured.
    ///
    /// Fails when `first` is not a subproject of the tree.
    pub fn enforce(tree: &ProjectTree, first: &str) -> Result<Self> {
        if tree.find(first).is_none() {
            return Err(Error::missing_evaluation_target(first));
        }

        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = tree
            .subprojects()
            .iter()
            .map(|module| graph.add_node(module.name().clone()))
            .collect();

        let first_idx = nodes
            .iter()
            .copied()
            .find(|&idx| graph[idx].as_str() == first)
            .ok_or_else(|| Error::missing_evaluation_target(first))?;

        // The designated module does not depend on itself.
        for &idx in nodes.iter().filter(|&&idx| idx != first_idx) {
            graph.add_edge(first_idx, idx, ());
        }

        let sequence = stable_topological_order(&graph);
        Ok(Self {
            graph,
            first: first_idx,
            sequence,
        })
    }

    /// The module configured before all others
    pub fn first(&self) -> &ModuleName {
        &self.graph[self.first]
    }

    /// A valid configuration sequence; ties keep declaration order
    pub fn sequence(&self) -> &[ModuleName] {
        &self.sequence
    }

    /// Whether `before` must be configured ahead of `after`
    pub fn must_precede(&self, before: &str, after: &str) -> bool {
        match (self.index_of(before), self.index_of(after)) {
            (Some(b), Some(a)) => self.graph.contains_edge(b, a),
            _ => false,
        }
    }

    /// Check a proposed configuration sequence.
    ///
    /// Every module in `sequence` must be known, must appear once, and must
    /// appear after all of its dependencies.
    pub fn validate_sequence<S: AsRef<str>>(&self, sequence: &[S]) -> Result<()> {
        let mut done: BTreeSet<NodeIndex> = BTreeSet::new();
        for name in sequence {
            let name: &str = name.as_ref();
            let idx = self.index_of(name).ok_or_else(|| Error::unknown_module(name))?;
            if done.contains(&idx) {
                return Err(Error::new(
                    ErrorCode::EvaluationOrderViolation,
                    format!("Module '{}' is configured more than once", name),
                ));
            }
            for dep in self.graph.neighbors_directed(idx, Direction::Incoming) {
                if !done.contains(&dep) {
                    return Err(Error::evaluation_order_violation(self.graph[dep].as_str(), name));
                }
            }
            done.insert(idx);
        }
        Ok(())
    }

    fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&idx| self.graph[idx].as_str() == name)
    }
}

/// Kahn's algorithm, always taking the ready node declared earliest
fn stable_topological_order(graph: &DiGraph<ModuleName, ()>) -> Vec<ModuleName> {
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.neighbors_directed(idx, Direction::Incoming).count())
        .collect();
    let mut ready: BTreeSet<NodeIndex> = graph
        .node_indices()
        .filter(|idx| in_degree[idx.index()] == 0)
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(idx) = ready.pop_first() {
        order.push(graph[idx].clone());
        for next in graph.neighbors_directed(idx, Direction::Outgoing) {
            in_degree[next.index()] -= 1;
            if in_degree[next.index()] == 0 {
                ready.insert(next);
            }
        }
    }
    order
}
