//! Request/response filter chain.
//!
//! # Data Flow
//! ```text
//! dispatch
//!     → filters[0].before … filters[n].before
//!     → route lookup / handler
//!     → filters[n].after … filters[0].after
//! ```
//!
//! # Design Decisions
//! - Filters observe only; they cannot reject or rewrite
//! - The first filter is outermost: it sees every request first and the
//!   final response last

pub mod logging;
pub mod metrics;

use std::sync::Arc;

use crate::http::{ApiRequest, ApiResponse};

pub use logging::LoggingFilter;
pub use metrics::MetricsFilter;

/// A cross-cutting hook run around every dispatched request.
pub trait Filter: Send + Sync {
    /// Called before the request is routed.
    fn before(&self, request: &ApiRequest);

    /// Called once the response is final.
    fn after(&self, request: &ApiRequest, response: &ApiResponse);
}

/// An ordered list of filters.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Vec<Arc<dyn Filter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter inside the ones already added.
    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn run_before(&self, request: &ApiRequest) {
        for filter in &self.filters {
            filter.before(request);
        }
    }

    pub fn run_after(&self, request: &ApiRequest, response: &ApiResponse) {
        for filter in self.filters.iter().rev() {
            filter.after(request, response);
        }
    }
}
