//! dds-api node
//!
//! Serves the cluster node's JSON API under `/api/v1`.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum fallback ──▶ Dispatcher ──▶ FilterChain.before
//!                                          │
//!                                          ▼
//!                                     RouteTable lookup ──▶ 404 / 415 / 406
//!                                          │
//!                                          ▼
//!                                     ApiHandler ──▶ Controller(config | friends)
//!                                          │
//!     Client Response                      ▼
//!     ◀────────────── ApiResponse ◀── FilterChain.after (reverse)
//! ```

use std::path::PathBuf;

use clap::Parser;

use dds_api::config::{load_config, ServerConfig};
use dds_api::lifecycle::{self, Shutdown};
use dds_api::observability::init_tracing;

#[derive(Parser)]
#[command(name = "dds-api")]
#[command(about = "HTTP API node for the dds cluster", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_tracing(&config.observability)?;
    tracing::info!("dds-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_body_size = config.listener.max_body_size,
        node = %config.cluster.node_name,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::shutdown_signal().await;
        shutdown.trigger();
    });

    lifecycle::run(config, receiver).await?;
    Ok(())
}
