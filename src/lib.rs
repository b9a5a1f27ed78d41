//! Cluster node HTTP API: route table, filter chain and handler façade.

pub mod api;
pub mod cluster;
pub mod config;
pub mod controller;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use api::ApiHandler;
pub use config::schema::ServerConfig;
pub use http::{ApiServer, Dispatcher};
pub use lifecycle::Shutdown;
