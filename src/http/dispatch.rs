//! Request dispatch: filter chain around route lookup and handler.
//!
//! # Responsibilities
//! - Run every filter's `before` hook, then route, then every `after` hook
//! - Answer unmatched routes and media mismatches without a handler
//! - Run handlers off the async runtime and recover from their panics
//!
//! # Design Decisions
//! - The filter chain wraps transport errors too, so every request gets
//!   exactly one request log line and one response log line
//! - A panicking handler yields a 500; the connection is never dropped
//! - Each exchange runs on a spawned task and completes even if the
//!   client disconnects first

use std::sync::Arc;

use crate::http::middleware::FilterChain;
use crate::http::{ApiRequest, ApiResponse, TransportError};
use crate::routing::{Lookup, RouteTable};

/// Owns the route table and the filter chain.
pub struct Dispatcher {
    table: Arc<RouteTable>,
    filters: Arc<FilterChain>,
}

impl Dispatcher {
    pub fn new(table: Arc<RouteTable>, filters: FilterChain) -> Self {
        Self {
            table,
            filters: Arc::new(filters),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    /// Dispatch one request through the filters to its handler.
    ///
    /// The exchange runs on its own task, so dropping the returned future
    /// (a client hanging up) does not skip the `after` hooks.
    pub async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        let table = Arc::clone(&self.table);
        let filters = Arc::clone(&self.filters);
        let path = request.path().to_string();

        let exchange = tokio::spawn(async move {
            let request = Arc::new(request);

            filters.run_before(&request);
            let response = route(&table, Arc::clone(&request)).await;
            filters.run_after(&request, &response);

            response
        });

        match exchange.await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Dispatch task failed");
                TransportError::HandlerFailed { route: path }.to_response()
            }
        }
    }

    /// Answer `request` with `error`, still running the filter chain.
    ///
    /// Used when the request cannot be dispatched at all, e.g. its body
    /// could not be read.
    pub fn reject(&self, request: ApiRequest, error: TransportError) -> ApiResponse {
        self.filters.run_before(&request);
        let response = error.to_response();
        self.filters.run_after(&request, &response);

        response
    }
}

async fn route(table: &RouteTable, request: Arc<ApiRequest>) -> ApiResponse {
    let entry = match table.lookup(request.method(), request.path()) {
        Lookup::Matched(entry) => entry,
        Lookup::NotFound => {
            tracing::debug!(method = %request.method(), path = %request.path(), "No route matched");
            return TransportError::RouteNotFound {
                method: request.method().to_string(),
                path: request.path().to_string(),
            }
            .to_response();
        }
    };

    let route = entry.full_path().to_string();

    if let Err(e) = entry.negotiate(&request) {
        tracing::debug!(route = %route, error = %e, "Media type negotiation failed");
        let mut response = e.to_response();
        response.set_route(route);
        return response;
    }

    let handler = Arc::clone(entry.handler());
    let outcome = tokio::task::spawn_blocking(move || {
        let mut response = ApiResponse::new();
        handler(request.as_ref(), &mut response);
        response
    })
    .await;

    let mut response = match outcome {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(route = %route, error = %e, "Handler failed");
            TransportError::HandlerFailed {
                route: route.clone(),
            }
            .to_response()
        }
    };
    response.set_route(route);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::middleware::LoggingFilter;
    use crate::observability::MemorySink;
    use axum::http::{header, HeaderValue, Method, StatusCode};
    use std::time::Duration;

    fn dispatcher(sink: Arc<MemorySink>) -> Dispatcher {
        let mut table = RouteTable::new("/api/v1");
        table
            .register(Method::GET, "/", |_, resp| {
                resp.write_json(StatusCode::OK, &serde_json::json!({"status": "ok"}));
            }, "StatusResponse")
            .unwrap();
        table
            .register(Method::POST, "/task", |_, resp| {
                resp.write_error(StatusCode::BAD_REQUEST, "BAD_REQUEST", "nope");
            }, "StatusResponse")
            .unwrap();
        table
            .register(Method::GET, "/task", |_, _| panic!("controller blew up"), "TaskList")
            .unwrap();
        table
            .register(Method::GET, "/friend", |_, resp| {
                std::thread::sleep(Duration::from_millis(200));
                resp.write_json(StatusCode::OK, &serde_json::json!({"status": "ok"}));
            }, "StatusResponse")
            .unwrap();

        Dispatcher::new(
            Arc::new(table),
            FilterChain::new().with(LoggingFilter::new(sink)),
        )
    }

    fn request(method: Method, uri: &str) -> ApiRequest {
        ApiRequest::new(method, uri.parse().unwrap())
    }

    fn assert_log_pair(lines: &[String], method: &str, uri: &str, status: u16) {
        assert_eq!(lines.len(), 2, "lines: {lines:?}");
        assert!(lines[0].contains(&format!("Incoming HTTP/1.1 {method} {uri} request")));
        assert!(lines[1].contains(&format!("with {status} status code")));
    }

    #[tokio::test]
    async fn test_matched_route() {
        let sink = Arc::new(MemorySink::new());
        let resp = dispatcher(sink.clone())
            .dispatch(request(Method::GET, "/api/v1/"))
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.route(), Some("/api/v1/"));
        assert_log_pair(&sink.lines(), "GET", "/api/v1/", 200);
    }

    #[tokio::test]
    async fn test_application_error_status_is_logged() {
        let sink = Arc::new(MemorySink::new());
        let resp = dispatcher(sink.clone())
            .dispatch(request(Method::POST, "/api/v1/task"))
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_log_pair(&sink.lines(), "POST", "/api/v1/task", 400);
    }

    #[tokio::test]
    async fn test_not_found_still_logged() {
        let sink = Arc::new(MemorySink::new());
        let d = dispatcher(sink.clone());

        let resp = d.dispatch(request(Method::GET, "/api/v1/unknown")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.route().is_none());
        assert_log_pair(&sink.lines(), "GET", "/api/v1/unknown", 404);

        sink.clear();
        let resp = d.dispatch(request(Method::PUT, "/api/v1/task")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_log_pair(&sink.lines(), "PUT", "/api/v1/task", 404);
        assert_eq!(d.routes().len(), 4);
    }

    #[tokio::test]
    async fn test_bad_media_type() {
        let sink = Arc::new(MemorySink::new());
        let req = request(Method::POST, "/api/v1/task")
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static("text/xml"))
            .with_body("<task/>");

        let resp = dispatcher(sink.clone()).dispatch(req).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        assert_log_pair(&sink.lines(), "POST", "/api/v1/task", 415);
    }

    #[tokio::test]
    async fn test_panicking_handler_recovered() {
        let sink = Arc::new(MemorySink::new());
        let resp = dispatcher(sink.clone())
            .dispatch(request(Method::GET, "/api/v1/task"))
            .await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: crate::http::ErrorBody = resp.json().unwrap();
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert_log_pair(&sink.lines(), "GET", "/api/v1/task", 500);
    }

    #[tokio::test]
    async fn test_reject_runs_filters() {
        let sink = Arc::new(MemorySink::new());
        let resp = dispatcher(sink.clone()).reject(
            request(Method::POST, "/api/v1/task"),
            TransportError::PayloadTooLarge { limit: 8 },
        );

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_log_pair(&sink.lines(), "POST", "/api/v1/task", 413);
    }

    #[tokio::test]
    async fn test_abandoned_dispatch_still_logs_response() {
        let sink = Arc::new(MemorySink::new());
        let d = dispatcher(sink.clone());

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            d.dispatch(request(Method::GET, "/api/v1/friend")),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(sink.lines().len(), 1);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_log_pair(&sink.lines(), "GET", "/api/v1/friend", 200);
    }
}
