//! Request metrics filter.

use crate::http::middleware::Filter;
use crate::http::{ApiRequest, ApiResponse};
use crate::observability::metrics as api_metrics;

/// Records request count and latency once the response is final.
///
/// Only responses from a matched route are recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsFilter;

impl Filter for MetricsFilter {
    fn before(&self, _request: &ApiRequest) {}

    fn after(&self, request: &ApiRequest, response: &ApiResponse) {
        let Some(route) = response.route() else {
            return;
        };
        api_metrics::record_request(
            request.method().as_str(),
            route,
            response.status().as_u16(),
            request.received_at(),
        );
    }
}
