//! Cluster-side collaborators handed to the API layer.
//!
//! # Data Flow
//! ```text
//! startup
//!     → ClusterConfig (read-only, from the [cluster] config section)
//!     → Friends       (peer directory, mutated by friend routes)
//!     → TaskStore     (owned by the task controller)
//!     → wrapped in Arc, bound into the ApiHandler once
//! ```
//!
//! # Design Decisions
//! - Each collaborator owns its own synchronization (DashMap shards)
//! - The API layer never reassigns these handles after construction

pub mod config;
pub mod friends;
pub mod tasks;

pub use config::ClusterConfig;
pub use friends::{Friend, FriendError, Friends};
pub use tasks::{Task, TaskError, TaskStore};
