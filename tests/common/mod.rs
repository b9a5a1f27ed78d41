//! Shared fixtures for the API integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;

use dds_api::api::{self, ApiHandler, StatusResponse};
use dds_api::cluster::{ClusterConfig, Friends};
use dds_api::config::ListenerConfig;
use dds_api::controller::Controller;
use dds_api::http::{ApiRequest, ApiResponse, ApiServer};
use dds_api::observability::MemorySink;

/// Remote address attached to in-process requests.
pub const REMOTE: &str = "127.0.0.1:54321";

/// Which collaborator a controller entry point received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    Nothing,
    Config(usize),
    Friends(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub entry: &'static str,
    pub received: Received,
}

/// Records every call and answers 200 with the entry point's name.
///
/// `add_task` echoes the request's `name` field, so concurrent callers can
/// tell their own response apart.
#[derive(Default)]
pub struct RecordingController {
    calls: Mutex<Vec<Call>>,
}

impl RecordingController {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, entry: &'static str, received: Received, response: &mut ApiResponse) {
        self.calls.lock().unwrap().push(Call { entry, received });
        response.write_json(StatusCode::OK, &StatusResponse::ok(entry));
    }
}

impl Controller for RecordingController {
    fn index(&self, _: &ApiRequest, response: &mut ApiResponse) {
        self.record("index", Received::Nothing, response);
    }

    fn list_tasks(&self, _: &ApiRequest, response: &mut ApiResponse) {
        self.record("list_tasks", Received::Nothing, response);
    }

    fn add_task(&self, request: &ApiRequest, response: &mut ApiResponse, config: &ClusterConfig) {
        self.record("add_task", Received::Config(addr_of(config)), response);
        let body: serde_json::Value = request.json().unwrap_or_default();
        let name = body["name"].as_str().unwrap_or_default();
        response.write_json(StatusCode::OK, &StatusResponse::ok(format!("add_task:{name}")));
    }

    fn add_friend(&self, _: &ApiRequest, response: &mut ApiResponse, friends: &Friends) {
        self.record("add_friend", Received::Friends(addr_of(friends)), response);
    }

    fn delete_friend(&self, _: &ApiRequest, response: &mut ApiResponse, friends: &Friends) {
        self.record("delete_friend", Received::Friends(addr_of(friends)), response);
    }
}

pub fn addr_of<T>(value: &T) -> usize {
    value as *const T as usize
}

/// A node wired to a [`RecordingController`], driven in-process.
pub struct TestNode {
    pub router: Router,
    pub sink: Arc<MemorySink>,
    pub config: Arc<ClusterConfig>,
    pub friends: Arc<Friends>,
    pub controller: Arc<RecordingController>,
}

impl TestNode {
    pub fn new() -> Self {
        Self::with_listener(ListenerConfig::default())
    }

    pub fn with_listener(listener: ListenerConfig) -> Self {
        let controller = Arc::new(RecordingController::default());
        Self::with_controller(controller.clone(), controller, listener)
    }

    /// `recorder` is the controller the node reports calls from; pass the
    /// same instance as `controller` unless the controller misbehaves.
    pub fn with_controller(
        controller: Arc<dyn Controller>,
        recorder: Arc<RecordingController>,
        listener: ListenerConfig,
    ) -> Self {
        let config = Arc::new(ClusterConfig::default());
        let friends = Arc::new(Friends::new());
        let handler = ApiHandler::builder()
            .config(Arc::clone(&config))
            .friends(Arc::clone(&friends))
            .controller(controller)
            .build()
            .unwrap();

        let sink = Arc::new(MemorySink::new());
        let dispatcher = api::create_dispatcher(Arc::new(handler), sink.clone()).unwrap();
        let router = ApiServer::new(Arc::new(dispatcher), &listener).router();

        Self {
            router,
            sink,
            config,
            friends,
            controller: recorder,
        }
    }

    pub fn config_addr(&self) -> usize {
        Arc::as_ptr(&self.config) as usize
    }

    pub fn friends_addr(&self) -> usize {
        Arc::as_ptr(&self.friends) as usize
    }
}

/// A bodiless request from [`REMOTE`].
pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(remote()))
        .body(Body::empty())
        .unwrap()
}

/// A JSON request from [`REMOTE`].
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .extension(ConnectInfo(remote()))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn remote() -> SocketAddr {
    REMOTE.parse().unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
