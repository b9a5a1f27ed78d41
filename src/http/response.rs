//! Outbound response carrier.
//!
//! # Responsibilities
//! - Collect the status, headers and body a controller writes
//! - Record which route produced the response (for metrics)
//! - Convert into an axum response at the edge
//!
//! # Design Decisions
//! - A fresh response is `200 OK` with an empty body
//! - JSON serialization failures degrade to a 500 with an error body

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::http::error::ErrorBody;
use crate::routing::MIME_JSON;

/// The response a handler writes into.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    route: Option<String>,
}

impl Default for ApiResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            route: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Write `value` as a JSON body with the given status.
    pub fn write_json<T: Serialize>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.status = status;
                self.body = body.into();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                self.status = StatusCode::INTERNAL_SERVER_ERROR;
                self.body = ErrorBody::new("INTERNAL_ERROR", "response serialization failed").to_bytes();
            }
        }
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(MIME_JSON));
    }

    /// Write a minimal JSON error body.
    pub fn write_error(&mut self, status: StatusCode, code: &str, message: impl Into<String>) {
        self.write_json(status, &ErrorBody::new(code, message));
    }

    /// Full path of the matched route, if the dispatcher matched one.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub(crate) fn set_route(&mut self, route: impl Into<String>) {
        self.route = Some(route.into());
    }

    /// Decode the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}
