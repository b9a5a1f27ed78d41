//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path, headers)
//!     → router.rs (route lookup by exact method + normalized path)
//!     → matcher.rs (prefix stripping, media type checks)
//!     → Return: matched RouteEntry or NotFound
//!
//! Route registration (at startup):
//!     register(method, path, handler, writes)
//!     → duplicate (method, path) rejected
//!     → table frozen behind Arc
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex in hot path (exact map lookup)
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;

pub use matcher::MIME_JSON;
pub use router::{Handler, Lookup, RouteEntry, RouteError, RouteTable};
