//! Route table: registration, lookup and media negotiation.
//!
//! # Responsibilities
//! - Store registered routes keyed by (method, normalized path)
//! - Reject duplicate registrations at startup
//! - Look up the route for a request, or report an explicit no-match
//! - Check a matched request's media types against the route
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, no locks)
//! - O(1) lookup via HashMap
//! - Explicit NotFound rather than silent default

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::{header, Method};
use thiserror::Error;

use crate::http::{ApiRequest, ApiResponse, TransportError};
use crate::routing::matcher::{self, MIME_JSON};

/// A route handler. Handlers write the response; nothing is returned.
pub type Handler = Arc<dyn Fn(&ApiRequest, &mut ApiResponse) + Send + Sync>;

/// Error raised while building a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route {method} {path} is already registered")]
    Duplicate { method: Method, path: String },
}

/// One registered route.
#[derive(Clone)]
pub struct RouteEntry {
    method: Method,
    path: String,
    full_path: String,
    handler: Handler,
    consumes: &'static str,
    produces: &'static str,
    writes: &'static str,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("path", &self.full_path)
            .field("consumes", &self.consumes)
            .field("produces", &self.produces)
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}

impl RouteEntry {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the table prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path including the table prefix.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn consumes(&self) -> &'static str {
        self.consumes
    }

    pub fn produces(&self) -> &'static str {
        self.produces
    }

    /// Documented shape of a successful response body.
    pub fn writes(&self) -> &'static str {
        self.writes
    }

    /// Check the request's `Content-Type` and `Accept` against this route.
    ///
    /// Only requests that carry a body (or declare a content type) on a
    /// body-bearing method are held to the consumed media type.
    pub fn negotiate(&self, request: &ApiRequest) -> Result<(), TransportError> {
        let content_type = request.header_str(&header::CONTENT_TYPE);
        let carries_body = !request.body().is_empty() || content_type.is_some();

        if carries_body && expects_body(request.method()) {
            let found = content_type.unwrap_or_default();
            if !matcher::content_type_matches(found, self.consumes) {
                return Err(TransportError::UnsupportedMediaType {
                    found: found.to_string(),
                    expected: self.consumes,
                });
            }
        }

        if let Some(accept) = request.header_str(&header::ACCEPT) {
            if !accept.trim().is_empty() && !matcher::accepts(accept, self.produces) {
                return Err(TransportError::NotAcceptable {
                    accept: accept.to_string(),
                    produces: self.produces,
                });
            }
        }

        Ok(())
    }
}

fn expects_body(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Result of a route lookup.
#[derive(Debug)]
pub enum Lookup<'a> {
    Matched(&'a RouteEntry),
    NotFound,
}

/// Declarative (method, path) → handler table under a fixed prefix.
pub struct RouteTable {
    prefix: String,
    entries: Vec<RouteEntry>,
    index: HashMap<(Method, String), usize>,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("prefix", &self.prefix)
            .field("entries", &self.entries)
            .finish()
    }
}

impl RouteTable {
    /// Create an empty table; every route lives under `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: matcher::normalize_path(prefix),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a JSON-in/JSON-out route.
    pub fn register<F>(
        &mut self,
        method: Method,
        path: &str,
        handler: F,
        writes: &'static str,
    ) -> Result<(), RouteError>
    where
        F: Fn(&ApiRequest, &mut ApiResponse) + Send + Sync + 'static,
    {
        let path = matcher::normalize_path(path);
        let key = (method.clone(), path.clone());
        if self.index.contains_key(&key) {
            return Err(RouteError::Duplicate { method, path });
        }

        let full_path = match (self.prefix.as_str(), path.as_str()) {
            ("/", p) => p.to_string(),
            (prefix, "/") => format!("{prefix}/"),
            (prefix, p) => format!("{prefix}{p}"),
        };

        self.index.insert(key, self.entries.len());
        self.entries.push(RouteEntry {
            method,
            path,
            full_path,
            handler: Arc::new(handler),
            consumes: MIME_JSON,
            produces: MIME_JSON,
            writes,
        });
        Ok(())
    }

    /// Find the route for a method and raw request path.
    pub fn lookup(&self, method: &Method, raw_path: &str) -> Lookup<'_> {
        let Some(path) = matcher::strip_prefix(&self.prefix, raw_path) else {
            return Lookup::NotFound;
        };

        match self.index.get(&(method.clone(), path)) {
            Some(&i) => Lookup::Matched(&self.entries[i]),
            None => Lookup::NotFound,
        }
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
