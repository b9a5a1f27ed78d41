//! JSON bodies exchanged on the API.

use serde::{Deserialize, Serialize};

use crate::cluster::Task;

pub use crate::cluster::Friend;

/// Generic outcome body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// `ok` or `error`.
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Body of `GET /task`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

/// Body of `POST /task`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    /// Node to run on; the cluster default applies when absent.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Body of `DELETE /friend`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRef {
    pub name: String,
}
