//! REST API handlers for the flowcheck server

use std::sync::Arc;

use axum::{
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Json},
};
use flowcheck_core::{Pipeline, ValidationResult};
use serde::Serialize;
use tracing::info;

use crate::{ApiError, ServerState};

/// Liveness response
#[derive(Debug, Serialize)]
pub struct PingResponse {
    #[serde(rename = "Ping")]
    pub ping: &'static str,
}

/// Liveness endpoint
pub async fn ping() -> impl IntoResponse {
    Json(PingResponse { ping: "Pong" })
}

/// Validate a submitted pipeline and report counts plus the DAG verdict.
pub async fn parse_pipeline(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<Pipeline>, JsonRejection>,
) -> Result<Json<ValidationResult>, ApiError> {
    let Json(pipeline) = payload?;
    let result = flowcheck_core::validate(&pipeline, &state.limits)?;

    info!(
        "Parsed pipeline: {} nodes, {} edges, is_dag={}",
        result.num_nodes, result.num_edges, result.is_dag
    );
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerConfig;
    use flowcheck_core::{Limits, PipelineEdge, PipelineNode};

    fn state(limits: Limits) -> Arc<ServerState> {
        let config = ServerConfig {
            limits,
            ..ServerConfig::default()
        };
        Arc::new(ServerState::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_parse_pipeline_handler() {
        let pipeline = Pipeline::new(
            vec![PipelineNode::new("A"), PipelineNode::new("B")],
            vec![PipelineEdge::new("A", "B"), PipelineEdge::new("B", "A")],
        );
        let Json(result) = parse_pipeline(State(state(Limits::default())), Ok(Json(pipeline)))
            .await
            .unwrap();

        assert_eq!(result.num_nodes, 2);
        assert_eq!(result.num_edges, 2);
        assert!(!result.is_dag);
    }

    #[tokio::test]
    async fn test_parse_pipeline_too_large() {
        let pipeline = Pipeline::new(vec![PipelineNode::new("A"), PipelineNode::new("B")], vec![]);
        let err = parse_pipeline(State(state(Limits::new(1, 1))), Ok(Json(pipeline)))
            .await
            .unwrap_err();

        assert_eq!(err.status, axum::http::StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.message.contains("2 nodes"));
    }
}
