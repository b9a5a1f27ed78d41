//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with a single dispatching fallback handler
//! - Wire up tower-http layers (request ID, trace)
//! - Buffer request bodies up to the configured limit (413 beyond it, 400
//!   when the body cannot be read)
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ListenerConfig;
use crate::http::{ApiRequest, Dispatcher, TransportError};

/// State injected into the fallback handler.
#[derive(Clone)]
struct ServerState {
    dispatcher: Arc<Dispatcher>,
    max_body_size: usize,
}

/// HTTP server for the node API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Create a server that hands every request to `dispatcher`.
    pub fn new(dispatcher: Arc<Dispatcher>, config: &ListenerConfig) -> Self {
        let state = ServerState {
            dispatcher,
            max_body_size: config.max_body_size,
        };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Routing happens in the dispatcher, so Axum only sees a fallback.
    fn build_router(state: ServerState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The Axum app, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Buffer the request and hand it to the dispatcher.
async fn dispatch_handler(State(state): State<ServerState>, request: Request<Body>) -> Response {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let (parts, body) = request.into_parts();
    match Limited::new(body, state.max_body_size).collect().await {
        Ok(collected) => {
            let request = ApiRequest::from_parts(parts, collected.to_bytes(), remote_addr);
            state.dispatcher.dispatch(request).await.into_response()
        }
        Err(e) => {
            let error = if e.is::<LengthLimitError>() {
                TransportError::PayloadTooLarge {
                    limit: state.max_body_size,
                }
            } else {
                TransportError::BodyUnreadable {
                    reason: e.to_string(),
                }
            };
            tracing::warn!(error = %error, "Failed to read request body");
            let request = ApiRequest::from_parts(parts, Bytes::new(), remote_addr);
            state.dispatcher.reject(request, error).into_response()
        }
    }
}
