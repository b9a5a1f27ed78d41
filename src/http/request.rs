//! Inbound request carrier.
//!
//! # Responsibilities
//! - Hold the transport metadata the filters log (protocol, method, URI, peer)
//! - Hold the fully buffered body handed to controllers
//! - Decode JSON bodies on behalf of controllers
//!
//! # Design Decisions
//! - Body is buffered before dispatch so handlers run off the async runtime
//! - Immutable once built; filters and handlers only borrow it

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Bytes;
use axum::http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method, Uri, Version};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A buffered HTTP request as seen by filters and handlers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    remote_addr: Option<SocketAddr>,
    body: Bytes,
    received_at: Instant,
}

impl ApiRequest {
    /// Create a bodiless HTTP/1.1 request.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            remote_addr: None,
            body: Bytes::new(),
            received_at: Instant::now(),
        }
    }

    /// Assemble a request from framework parts and an already-read body.
    pub fn from_parts(parts: Parts, body: Bytes, remote_addr: Option<SocketAddr>) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            remote_addr,
            body,
            received_at: Instant::now(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `value` as the body and declare it as JSON.
    pub fn with_json<T: Serialize>(self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .with_header(
                header::CONTENT_TYPE,
                HeaderValue::from_static(crate::routing::MIME_JSON),
            )
            .with_body(body))
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Path plus query string, as sent on the request line.
    pub fn request_uri(&self) -> &str {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| self.uri.path())
    }

    /// Protocol name such as `HTTP/1.1`.
    pub fn protocol(&self) -> String {
        format!("{:?}", self.version)
    }

    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Peer address for log lines; `unknown` when the transport gave none.
    pub fn remote(&self) -> String {
        self.remote_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn received_at(&self) -> Instant {
        self.received_at
    }
}
