//! Core data structures for submitted pipelines

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of a pipeline node.
///
/// Any JSON scalar except `null` is accepted. Integral floats are folded
/// into integers on deserialization, so `1.0` and `1` are the same node.
/// Strings and booleans never equal numbers: `"1"`, `true` and `1` name
/// three distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged, from = "RawNodeId")]
pub enum NodeId {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

/// Wire form of [`NodeId`] before number normalization.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNodeId {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl From<RawNodeId> for NodeId {
    fn from(raw: RawNodeId) -> Self {
        match raw {
            RawNodeId::Text(s) => NodeId::Text(s),
            RawNodeId::Number(n) => NodeId::Number(fold_integral(n)),
            RawNodeId::Bool(b) => NodeId::Bool(b),
        }
    }
}

fn fold_integral(n: serde_json::Number) -> serde_json::Number {
    match n.as_f64() {
        Some(f)
            if n.is_f64()
                && f.fract() == 0.0
                && f >= i64::MIN as f64
                && f < i64::MAX as f64 =>
        {
            (f as i64).into()
        }
        _ => n,
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Text(s) => f.write_str(s),
            NodeId::Number(n) => write!(f, "{n}"),
            NodeId::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Text(s)
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Number(n.into())
    }
}

impl From<u64> for NodeId {
    fn from(n: u64) -> Self {
        NodeId::Number(n.into())
    }
}

/// A node as submitted by the pipeline editor.
///
/// Only `id` is meaningful here; editor metadata such as `type`, `position`
/// or `data` is accepted and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineNode {
    pub id: NodeId,
}

impl PipelineNode {
    pub fn new(id: impl Into<NodeId>) -> Self {
        PipelineNode { id: id.into() }
    }
}

/// A directed edge from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineEdge {
    pub source: NodeId,
    pub target: NodeId,
}

impl PipelineEdge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        PipelineEdge {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A submitted pipeline: nodes plus directed edges between them.
///
/// Either list defaults to empty when the field is absent. An explicit
/// `null` is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub nodes: Vec<PipelineNode>,
    #[serde(default)]
    pub edges: Vec<PipelineEdge>,
}

impl Pipeline {
    pub fn new(nodes: Vec<PipelineNode>, edges: Vec<PipelineEdge>) -> Self {
        Pipeline { nodes, edges }
    }

    /// Parse a pipeline document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a pipeline document from a reader (file, stdin).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ValidationError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Outcome of validating a pipeline.
///
/// Counts are the literal input lengths, including duplicate nodes and
/// dangling edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_dag: bool,
}
