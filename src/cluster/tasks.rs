//! Task storage for this node.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A task accepted by this node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    /// Node the task is scheduled on.
    pub target: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task capacity of {0} reached")]
    CapacityReached(usize),
}

/// A thread-safe task store keyed by task id.
#[derive(Debug, Default)]
pub struct TaskStore {
    inner: DashMap<Uuid, Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new task, refusing once `capacity` tasks are held.
    pub fn insert(
        &self,
        name: String,
        target: String,
        payload: serde_json::Value,
        capacity: usize,
    ) -> Result<Task, TaskError> {
        // Capacity is a soft bound under concurrent inserts.
        if self.inner.len() >= capacity {
            return Err(TaskError::CapacityReached(capacity));
        }

        let task = Task {
            id: Uuid::new_v4(),
            name,
            target,
            payload,
            created_at: Utc::now(),
        };
        self.inner.insert(task.id, task.clone());
        tracing::debug!(task_id = %task.id, target = %task.target, "Task stored");
        Ok(task)
    }

    /// All tasks ordered by creation time.
    pub fn list(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.inner.iter().map(|r| r.value().clone()).collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        tasks
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
