//! Transport-level errors produced by the dispatcher itself.
//!
//! Controller failures never pass through here; controllers write their own
//! status and body.

use axum::body::Bytes;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::response::ApiResponse;

/// Minimal JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub(crate) fn to_bytes(&self) -> Bytes {
        // Two string fields always serialize.
        serde_json::to_vec(self).map(Bytes::from).unwrap_or_default()
    }
}

/// Conditions the dispatcher answers without reaching a handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("unsupported media type '{found}', expected {expected}")]
    UnsupportedMediaType { found: String, expected: &'static str },

    #[error("none of the acceptable media types '{accept}' is produced, only {produces}")]
    NotAcceptable { accept: String, produces: &'static str },

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("request body could not be read: {reason}")]
    BodyUnreadable { reason: String },

    #[error("handler for {route} failed without writing a response")]
    HandlerFailed { route: String },
}

impl TransportError {
    pub fn status(&self) -> StatusCode {
        match self {
            TransportError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            TransportError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            TransportError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            TransportError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            TransportError::BodyUnreadable { .. } => StatusCode::BAD_REQUEST,
            TransportError::HandlerFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TransportError::RouteNotFound { .. } => "NOT_FOUND",
            TransportError::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            TransportError::NotAcceptable { .. } => "NOT_ACCEPTABLE",
            TransportError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            TransportError::BodyUnreadable { .. } => "BAD_REQUEST",
            TransportError::HandlerFailed { .. } => "INTERNAL_ERROR",
        }
    }

    /// Render as a JSON error response.
    pub fn to_response(&self) -> ApiResponse {
        let mut response = ApiResponse::new();
        response.write_error(self.status(), self.code(), self.to_string());
        response
    }
}
