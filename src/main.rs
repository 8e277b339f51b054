//! Flowcheck CLI entry point

use clap::{Args, Parser, Subcommand};
use flowcheck_core::Limits;
use flowcheck_server::{DEFAULT_ALLOWED_ORIGIN, DEFAULT_HOST, DEFAULT_PORT, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "flowcheck")]
#[command(about = "Pipeline DAG validation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the validation server
    Serve {
        /// Host to bind to
        #[arg(long, env = "FLOWCHECK_HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "FLOWCHECK_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Browser origin allowed to call the API
        #[arg(long, env = "FLOWCHECK_ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
        allowed_origin: String,

        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Validate a pipeline JSON file ("-" for stdin) and print the result
    Check {
        file: PathBuf,

        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Show version
    Version,
}

#[derive(Args)]
struct LimitArgs {
    /// Reject pipelines with more nodes than this
    #[arg(long, env = "FLOWCHECK_MAX_NODES", default_value_t = Limits::DEFAULT_MAX_NODES)]
    max_nodes: usize,

    /// Reject pipelines with more edges than this
    #[arg(long, env = "FLOWCHECK_MAX_EDGES", default_value_t = Limits::DEFAULT_MAX_EDGES)]
    max_edges: usize,
}

impl From<LimitArgs> for Limits {
    fn from(args: LimitArgs) -> Self {
        Limits::new(args.max_nodes, args.max_edges)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads env fallbacks
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "flowcheck={0},flowcheck_core={0},flowcheck_server={0},tower_http={0}",
            log_level
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            allowed_origin,
            limits,
        } => {
            tracing::info!("Flowcheck v{}", env!("CARGO_PKG_VERSION"));
            let config = ServerConfig {
                host,
                port,
                allowed_origin,
                limits: limits.into(),
            };
            commands::serve(config).await
        }
        Commands::Check { file, limits } => commands::check(&file, limits.into()),
        Commands::Version => {
            println!("Flowcheck v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
