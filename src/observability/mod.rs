//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Filter chain produces:
//!     → logging.rs (access log lines through a LogSink)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → tracing subscriber (stdout) or access log file
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Access lines are a best-effort side channel; failures never reach clients
//! - Request ID (x-request-id) is set by tower-http at the edge
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use logging::{init_tracing, FileSink, LogSink, MemorySink, SinkError, TracingSink};
