//! Acyclicity check: three-color depth-first search over the pipeline graph
//!
//! The walk keeps its own stack of `(node, remaining successors)` frames on
//! the heap, so traversal depth is bounded by memory rather than by the
//! thread's call stack. Input size is bounded separately by [`Limits`].

use petgraph::graph::{Neighbors, NodeIndex};
use tracing::{debug, trace};

use crate::error::ValidationError;
use crate::graph::PipelineGraph;
use crate::model::{NodeId, Pipeline, PipelineEdge, PipelineNode, ValidationResult};

/// Upper bounds on submitted pipeline size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_nodes: usize,
    pub max_edges: usize,
}

impl Limits {
    pub const DEFAULT_MAX_NODES: usize = 10_000;
    pub const DEFAULT_MAX_EDGES: usize = 50_000;

    pub fn new(max_nodes: usize, max_edges: usize) -> Self {
        Limits {
            max_nodes,
            max_edges,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(usize::MAX, usize::MAX)
    }

    /// Reject input whose node or edge count exceeds the limits.
    pub fn check(&self, nodes: usize, edges: usize) -> Result<(), ValidationError> {
        if nodes > self.max_nodes {
            return Err(ValidationError::GraphTooLarge {
                what: "nodes",
                count: nodes,
                limit: self.max_nodes,
            });
        }
        if edges > self.max_edges {
            return Err(ValidationError::GraphTooLarge {
                what: "edges",
                count: edges,
                limit: self.max_edges,
            });
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_NODES, Self::DEFAULT_MAX_EDGES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not visited yet.
    White,
    /// On the active path.
    Gray,
    /// Fully explored, no cycle through it.
    Black,
}

/// Validate a pipeline: counts plus the acyclicity verdict.
pub fn validate(
    pipeline: &Pipeline,
    limits: &Limits,
) -> Result<ValidationResult, ValidationError> {
    validate_parts(&pipeline.nodes, &pipeline.edges, limits)
}

/// Validate a `(nodes, edges)` pair.
///
/// Dangling edges are dead ends and never fail validation. Oversized input
/// fails with [`ValidationError::GraphTooLarge`] before any graph is built.
pub fn validate_parts(
    nodes: &[PipelineNode],
    edges: &[PipelineEdge],
    limits: &Limits,
) -> Result<ValidationResult, ValidationError> {
    limits.check(nodes.len(), edges.len())?;

    let graph = PipelineGraph::from_parts(nodes, edges);
    let is_dag = match find_back_edge(&graph) {
        Some((source, target)) => {
            debug!("Cycle detected: back edge {} -> {}", source, target);
            false
        }
        None => true,
    };

    Ok(ValidationResult {
        num_nodes: nodes.len(),
        num_edges: edges.len(),
        is_dag,
    })
}

/// Find an edge that closes a directed cycle, if any.
///
/// Every vertex is used as a root until one walk hits a gray successor, so
/// disconnected components are all covered. Returns the `(source, target)`
/// ids of the first back edge found.
pub fn find_back_edge(graph: &PipelineGraph) -> Option<(NodeId, NodeId)> {
    let inner = graph.inner();
    let mut color = vec![Color::White; inner.node_count()];
    let mut stack: Vec<(NodeIndex, Neighbors<'_, ()>)> = Vec::new();

    for root in inner.node_indices() {
        if color[root.index()] != Color::White {
            continue;
        }
        trace!("Walking from {}", inner[root]);
        color[root.index()] = Color::Gray;
        stack.push((root, inner.neighbors(root)));

        while let Some((node, successors)) = stack.last_mut() {
            let node = *node;
            match successors.next() {
                Some(next) => match color[next.index()] {
                    Color::Gray => return Some((inner[node].clone(), inner[next].clone())),
                    Color::White => {
                        color[next.index()] = Color::Gray;
                        stack.push((next, inner.neighbors(next)));
                    }
                    // forward or cross edge
                    Color::Black => {}
                },
                None => {
                    color[node.index()] = Color::Black;
                    stack.pop();
                }
            }
        }
    }

    None
}
