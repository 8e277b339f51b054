//! Flowcheck Core — pipeline data model, adjacency graph, and DAG validation

pub mod error;
pub mod graph;
pub mod model;
pub mod validate;


pub use error::ValidationError;
pub use graph::PipelineGraph;
pub use model::{NodeId, Pipeline, PipelineEdge, PipelineNode, ValidationResult};
pub use validate::{Limits, find_back_edge, validate, validate_parts};
