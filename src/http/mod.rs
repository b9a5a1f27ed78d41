//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, body buffering)
//!     → request.rs (ApiRequest carrier)
//!     → dispatch.rs (filters before → route lookup → handler → filters after)
//!     → response.rs (ApiResponse carrier → Axum response)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod error;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::Dispatcher;
pub use error::{ErrorBody, TransportError};
pub use request::ApiRequest;
pub use response::ApiResponse;
pub use server::ApiServer;
