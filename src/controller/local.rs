//! In-process controller backed by the node's own stores.

use axum::http::StatusCode;

use crate::api::models::{Friend, FriendRef, NewTask, StatusResponse, TaskList};
use crate::cluster::{ClusterConfig, FriendError, Friends, TaskError, TaskStore};
use crate::controller::Controller;
use crate::http::{ApiRequest, ApiResponse};

/// Serves the API from local state.
#[derive(Debug, Default)]
pub struct LocalController {
    tasks: TaskStore,
}

impl LocalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }
}

fn bad_request(response: &mut ApiResponse, message: String) {
    response.write_json(StatusCode::BAD_REQUEST, &StatusResponse::error(message));
}

impl Controller for LocalController {
    fn index(&self, _request: &ApiRequest, response: &mut ApiResponse) {
        response.write_json(
            StatusCode::OK,
            &StatusResponse::ok(format!("dds-api v{} operational", env!("CARGO_PKG_VERSION"))),
        );
    }

    fn list_tasks(&self, _request: &ApiRequest, response: &mut ApiResponse) {
        response.write_json(
            StatusCode::OK,
            &TaskList {
                tasks: self.tasks.list(),
            },
        );
    }

    fn add_task(&self, request: &ApiRequest, response: &mut ApiResponse, config: &ClusterConfig) {
        let new_task: NewTask = match request.json() {
            Ok(t) => t,
            Err(e) => return bad_request(response, format!("invalid task payload: {e}")),
        };
        if new_task.name.trim().is_empty() {
            return bad_request(response, "task name must not be empty".to_string());
        }

        let target = config.resolve_target(new_task.target.as_deref()).to_string();
        match self
            .tasks
            .insert(new_task.name, target, new_task.payload, config.max_tasks)
        {
            Ok(task) => response.write_json(
                StatusCode::CREATED,
                &StatusResponse::ok(format!("task {} scheduled on {}", task.id, task.target)),
            ),
            Err(e @ TaskError::CapacityReached(_)) => {
                tracing::warn!(node = %config.node_name, error = %e, "Task rejected");
                response.write_json(
                    StatusCode::SERVICE_UNAVAILABLE,
                    &StatusResponse::error(e.to_string()),
                );
            }
        }
    }

    fn add_friend(&self, request: &ApiRequest, response: &mut ApiResponse, friends: &Friends) {
        let friend: Friend = match request.json() {
            Ok(f) => f,
            Err(e) => return bad_request(response, format!("invalid friend descriptor: {e}")),
        };
        if friend.name.trim().is_empty() || friend.address.trim().is_empty() {
            return bad_request(response, "friend name and address are required".to_string());
        }

        let name = friend.name.clone();
        match friends.add(friend) {
            Ok(()) => response.write_json(
                StatusCode::CREATED,
                &StatusResponse::ok(format!("friend {name} added")),
            ),
            Err(e @ FriendError::AlreadyExists(_)) => {
                response.write_json(StatusCode::CONFLICT, &StatusResponse::error(e.to_string()))
            }
            Err(e) => response.write_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &StatusResponse::error(e.to_string()),
            ),
        }
    }

    fn delete_friend(&self, request: &ApiRequest, response: &mut ApiResponse, friends: &Friends) {
        let friend: FriendRef = match request.json() {
            Ok(f) => f,
            Err(e) => return bad_request(response, format!("invalid friend reference: {e}")),
        };

        match friends.remove(&friend.name) {
            Ok(removed) => response.write_json(
                StatusCode::OK,
                &StatusResponse::ok(format!("friend {} removed", removed.name)),
            ),
            Err(e @ FriendError::NotFound(_)) => {
                response.write_json(StatusCode::NOT_FOUND, &StatusResponse::error(e.to_string()))
            }
            Err(e) => response.write_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &StatusResponse::error(e.to_string()),
            ),
        }
    }
}
