//! Request and response logging filter.

use std::sync::Arc;

use chrono::{DateTime, Local, SecondsFormat, TimeZone};

use crate::http::middleware::Filter;
use crate::http::{ApiRequest, ApiResponse};
use crate::observability::LogSink;

/// Format the line emitted before a request is handled.
pub fn format_request_log<Tz: TimeZone>(request: &ApiRequest, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "[{}] Incoming {} {} {} request from: {}",
        now.to_rfc3339_opts(SecondsFormat::Secs, false),
        request.protocol(),
        request.method(),
        request.request_uri(),
        request.remote(),
    )
}

/// Format the line emitted after a response is final.
pub fn format_response_log<Tz: TimeZone>(
    response: &ApiResponse,
    request: &ApiRequest,
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "[{}] Outgoing response to {} with {} status code",
        now.to_rfc3339_opts(SecondsFormat::Secs, false),
        request.remote(),
        response.status().as_u16(),
    )
}

/// Emits one line per request and one per response.
pub struct LoggingFilter {
    sink: Arc<dyn LogSink>,
}

impl LoggingFilter {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    fn emit(&self, line: &str) {
        if let Err(e) = self.sink.emit(line) {
            tracing::warn!(error = %e, "Access log line dropped");
        }
    }
}

impl Filter for LoggingFilter {
    fn before(&self, request: &ApiRequest) {
        self.emit(&format_request_log(request, &Local::now()));
    }

    fn after(&self, request: &ApiRequest, response: &ApiResponse) {
        self.emit(&format_response_log(response, request, &Local::now()));
    }
}
