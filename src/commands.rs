//! CLI command implementations

use anyhow::Context;
use flowcheck_core::{Limits, Pipeline};
use flowcheck_server::{FlowcheckServer, ServerConfig};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting flowcheck server on {}:{}", config.host, config.port);
    tracing::info!(
        "Limits: {} nodes, {} edges",
        config.limits.max_nodes,
        config.limits.max_edges
    );

    let server = FlowcheckServer::new(config)?;
    server.start().await
}

pub fn check(file: &Path, limits: Limits) -> anyhow::Result<()> {
    let pipeline = if file == Path::new("-") {
        Pipeline::from_reader(io::stdin().lock()).context("failed to parse pipeline from stdin")?
    } else {
        let reader = File::open(file)
            .with_context(|| format!("cannot open {}", file.display()))?;
        Pipeline::from_reader(BufReader::new(reader))
            .with_context(|| format!("failed to parse {}", file.display()))?
    };

    let result = flowcheck_core::validate(&pipeline, &limits)?;
    tracing::debug!(
        "Checked {}: {} nodes, {} edges",
        file.display(),
        result.num_nodes,
        result.num_edges
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
