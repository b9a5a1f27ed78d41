//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate the configuration
//! - Create the collaborators and bind them into the API handler
//! - Build the route table and the filter chain
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last, so no request arrives before the routes exist

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::api::{self, ApiHandler, CollaboratorUnavailable};
use crate::cluster::Friends;
use crate::config::{validate_config, ConfigError, ObservabilityConfig, ServerConfig};
use crate::controller::LocalController;
use crate::http::{ApiServer, Dispatcher};
use crate::observability::{metrics, FileSink, LogSink, SinkError, TracingSink};
use crate::routing::RouteError;

/// Fatal error raised before the node starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    CollaboratorUnavailable(#[from] CollaboratorUnavailable),

    #[error("Route table: {0}")]
    Routes(#[from] RouteError),

    #[error("Configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Access log: {0}")]
    Sink(#[from] SinkError),

    #[error("Metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the access log destination.
pub fn open_sink(config: &ObservabilityConfig) -> Result<Arc<dyn LogSink>, SinkError> {
    match &config.access_log_file {
        Some(path) => {
            let sink = FileSink::open(Path::new(path))?;
            tracing::info!(path = %path, "Access log file opened");
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(TracingSink)),
    }
}

/// Create the collaborators and assemble the dispatcher around them.
pub fn build_dispatcher(
    config: &ServerConfig,
    sink: Arc<dyn LogSink>,
) -> Result<Dispatcher, StartupError> {
    let handler = ApiHandler::builder()
        .config(Arc::new(config.cluster.clone()))
        .friends(Arc::new(Friends::new()))
        .controller(Arc::new(LocalController::new()))
        .build()?;

    tracing::debug!(?handler, "API handler ready");
    Ok(api::create_dispatcher(Arc::new(handler), sink)?)
}

/// Start the node and serve until `shutdown` fires.
pub async fn run(
    config: ServerConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    if config.observability.metrics_enabled {
        // Validated above.
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr)?;
        }
    }

    let sink = open_sink(&config.observability)?;
    let dispatcher = build_dispatcher(&config, sink)?;
    tracing::info!(
        node = %config.cluster.node_name,
        routes = dispatcher.routes().len(),
        "Routes registered"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = ApiServer::new(Arc::new(dispatcher), &config.listener);
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
