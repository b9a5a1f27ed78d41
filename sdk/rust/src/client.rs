use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Outcome body returned by the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friend {
    pub name: String,
    pub address: String,
}

/// A decoded response with its status code.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: T,
}

pub struct DdsClient {
    client: Client,
    base_url: String,
}

impl DdsClient {
    /// `node_url` is the scheme and authority, e.g. `http://127.0.0.1:8080`.
    pub fn new(node_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/api/v1", node_url.trim_end_matches('/')),
        }
    }

    pub async fn status(&self) -> Result<Reply<StatusResponse>, Error> {
        let resp = self.client.get(format!("{}/", self.base_url)).send().await?;
        decode(resp).await
    }

    pub async fn list_tasks(&self) -> Result<Reply<TaskList>, Error> {
        let resp = self
            .client
            .get(format!("{}/task", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }

    /// Schedule a task; `target` falls back to the node's default.
    pub async fn add_task(
        &self,
        name: &str,
        target: Option<&str>,
    ) -> Result<Reply<StatusResponse>, Error> {
        let resp = self
            .client
            .post(format!("{}/task", self.base_url))
            .json(&serde_json::json!({ "name": name, "target": target }))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn add_friend(&self, friend: &Friend) -> Result<Reply<StatusResponse>, Error> {
        let resp = self
            .client
            .post(format!("{}/friend", self.base_url))
            .json(friend)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn remove_friend(&self, name: &str) -> Result<Reply<StatusResponse>, Error> {
        let resp = self
            .client
            .delete(format!("{}/friend", self.base_url))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        decode(resp).await
    }

    /// Send a raw request, for paths outside the typed calls.
    pub async fn raw(&self, method: reqwest::Method, path: &str) -> Result<Response, reqwest::Error> {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<Reply<T>, Error> {
    let status = resp.status();
    let text = resp.text().await?;
    let body = serde_json::from_str::<T>(&text)
        .map_err(|e| format!("node returned {status} with undecodable body {text:?}: {e}"))?;
    Ok(Reply { status, body })
}
