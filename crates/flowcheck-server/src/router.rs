//! Axum router setup for the flowcheck server

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    ServerState,
    handlers::{parse_pipeline, ping},
};

/// Create the axum router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    let cors = cors_layer(state.allowed_origin.clone());

    Router::new()
        .route("/", get(ping))
        .route("/pipelines/parse", post(parse_pipeline))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for a single origin.
///
/// Only a request whose `Origin` matches gets `Access-Control-Allow-Origin`
/// back. Any method and header is accepted from that origin. They are
/// mirrored from the preflight request because wildcards are not allowed
/// together with credentials.
pub fn cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([allowed_origin]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
