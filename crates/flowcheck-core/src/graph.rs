//! Adjacency view of a submitted pipeline, backed by petgraph::DiGraph

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::model::{NodeId, PipelineEdge, PipelineNode};

/// The pipeline graph: one vertex per distinct node id, one edge per
/// submitted edge whose endpoints are both registered.
///
/// Built fresh for every validation and dropped afterwards.
pub struct PipelineGraph {
    inner: DiGraph<NodeId, ()>,
    index: HashMap<NodeId, NodeIndex>,
    dangling: usize,
}

impl std::fmt::Debug for PipelineGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .field("dangling", &self.dangling)
            .finish()
    }
}

impl PipelineGraph {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        PipelineGraph {
            inner: DiGraph::with_capacity(nodes, edges),
            index: HashMap::with_capacity(nodes),
            dangling: 0,
        }
    }

    /// Build the adjacency view from submitted nodes and edges.
    ///
    /// All nodes are registered before any edge, so edge order relative to
    /// node order does not matter.
    pub fn from_parts(nodes: &[PipelineNode], edges: &[PipelineEdge]) -> Self {
        let mut graph = Self::with_capacity(nodes.len(), edges.len());
        for node in nodes {
            graph.add_node(node.id.clone());
        }
        for edge in edges {
            graph.add_edge(&edge.source, &edge.target);
        }

        if graph.dangling > 0 {
            debug!(
                "Dropped {} dangling edge(s) out of {}",
                graph.dangling,
                edges.len()
            );
        }
        if graph.node_count() < nodes.len() {
            debug!(
                "Collapsed {} duplicate node id(s)",
                nodes.len() - graph.node_count()
            );
        }
        graph
    }

    /// Register a node id. A duplicate id resolves to the existing vertex.
    pub fn add_node(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.inner.add_node(id.clone());
        self.index.insert(id, idx);
        idx
    }

    /// Add a directed edge between two registered ids.
    ///
    /// Returns `false` and counts the edge as dangling when either endpoint
    /// is unknown.
    pub fn add_edge(&mut self, source: &NodeId, target: &NodeId) -> bool {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&s), Some(&t)) => {
                self.inner.add_edge(s, t, ());
                true
            }
            _ => {
                self.dangling += 1;
                false
            }
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of distinct node ids.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges in the adjacency view (dangling edges excluded).
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Number of submitted edges that referenced an unknown id.
    pub fn dangling_edges(&self) -> usize {
        self.dangling
    }

    /// Direct successors of `id`, in the order their edges were submitted.
    ///
    /// Total: an unknown id has no successors.
    pub fn successors(&self, id: &NodeId) -> Vec<&NodeId> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        // petgraph lists the most recently added edge first
        let mut successors: Vec<&NodeId> =
            self.inner.neighbors(idx).map(|n| &self.inner[n]).collect();
        successors.reverse();
        successors
    }

    /// Whether the graph has no directed cycle.
    pub fn is_dag(&self) -> bool {
        crate::validate::find_back_edge(self).is_none()
    }

    pub(crate) fn inner(&self) -> &DiGraph<NodeId, ()> {
        &self.inner
    }
}

impl Default for PipelineGraph {
    fn default() -> Self {
        Self::new()
    }
}
