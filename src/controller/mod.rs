//! Controller entry points behind the API routes.
//!
//! Controllers own validation, business logic and the response status and
//! body. The API layer only picks the entry point and the collaborator.

pub mod local;

use crate::cluster::{ClusterConfig, Friends};
use crate::http::{ApiRequest, ApiResponse};

pub use local::LocalController;

/// The business-logic side of the API.
pub trait Controller: Send + Sync {
    /// Node status.
    fn index(&self, request: &ApiRequest, response: &mut ApiResponse);

    fn list_tasks(&self, request: &ApiRequest, response: &mut ApiResponse);

    fn add_task(&self, request: &ApiRequest, response: &mut ApiResponse, config: &ClusterConfig);

    fn add_friend(&self, request: &ApiRequest, response: &mut ApiResponse, friends: &Friends);

    fn delete_friend(&self, request: &ApiRequest, response: &mut ApiResponse, friends: &Friends);
}
