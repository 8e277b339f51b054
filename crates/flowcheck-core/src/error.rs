//! Error types for pipeline validation

use thiserror::Error;

/// Errors surfaced by the validator to its caller.
///
/// Dangling edge references are not errors: they are dropped from the
/// adjacency view and only counted (see [`crate::PipelineGraph::dangling_edges`]).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The submitted graph exceeds the configured [`crate::Limits`].
    #[error("graph too large: {count} {what} exceeds the limit of {limit}")]
    GraphTooLarge {
        /// Which part of the input overflowed: `"nodes"` or `"edges"`.
        what: &'static str,
        count: usize,
        limit: usize,
    },

    /// A pipeline document could not be parsed into nodes and edges.
    #[error("malformed pipeline: {0}")]
    MalformedPipeline(#[from] serde_json::Error),
}

impl ValidationError {
    pub fn is_too_large(&self) -> bool {
        matches!(self, ValidationError::GraphTooLarge { .. })
    }
}
