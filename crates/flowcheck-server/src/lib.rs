//! HTTP server exposing pipeline validation

pub mod error;
pub mod handlers;
pub mod router;

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::HeaderValue;
use flowcheck_core::Limits;
use tokio::net::TcpListener;
use tracing::info;

pub use error::ApiError;
pub use router::create_router;

/// Origin of the pipeline editor served by its dev server.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The single origin allowed to call the API from a browser.
    pub allowed_origin: String,
    pub limits: Limits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            limits: Limits::default(),
        }
    }
}

/// State shared by all handlers. Immutable after startup.
#[derive(Debug)]
pub struct ServerState {
    pub limits: Limits,
    pub allowed_origin: HeaderValue,
}

impl ServerState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let allowed_origin = HeaderValue::from_str(&config.allowed_origin)
            .with_context(|| format!("invalid allowed origin: {:?}", config.allowed_origin))?;
        Ok(ServerState {
            limits: config.limits,
            allowed_origin,
        })
    }
}

/// The flowcheck HTTP server
pub struct FlowcheckServer {
    config: ServerConfig,
    state: Arc<ServerState>,
}

impl FlowcheckServer {
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let state = Arc::new(ServerState::new(&config)?);
        Ok(FlowcheckServer { config, state })
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    pub fn router(&self) -> Router {
        create_router(self.state())
    }

    /// Bind the configured address. Port `0` lets the OS pick one.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        Ok(listener)
    }

    /// Serve requests on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        info!(
            "Listening on http://{} (allowed origin: {})",
            listener.local_addr()?,
            self.config.allowed_origin
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Server stopped");
        Ok(())
    }

    /// Bind and serve until Ctrl-C.
    pub async fn start(self) -> anyhow::Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
