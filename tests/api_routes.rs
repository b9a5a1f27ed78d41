//! Route, filter and façade behavior driven through the Axum app in-process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use dds_api::api::{self, ApiHandler};
use dds_api::cluster::{ClusterConfig, Friends};
use dds_api::config::ListenerConfig;
use dds_api::controller::Controller;
use dds_api::http::{ApiRequest, ApiResponse};
use dds_api::routing::{RouteError, RouteTable};

mod common;

use common::{body_json, json_request, request, Call, Received, RecordingController, TestNode};

fn assert_logged(node: &TestNode, incoming: &str, status: u16) {
    let lines = node.sink.lines();
    assert_eq!(lines.len(), 2, "unexpected log lines: {lines:?}");
    assert!(lines[0].starts_with('['));
    assert!(
        lines[0].ends_with(&format!("] Incoming HTTP/1.1 {incoming} request from: 127.0.0.1:54321")),
        "{}",
        lines[0]
    );
    assert!(
        lines[1].ends_with(&format!(
            "] Outgoing response to 127.0.0.1:54321 with {status} status code"
        )),
        "{}",
        lines[1]
    );
}

#[tokio::test]
async fn test_get_root_invokes_index() {
    let node = TestNode::new();

    let res = node
        .router
        .clone()
        .oneshot(request(Method::GET, "/api/v1/"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_json(res).await["message"], "index");
    assert_eq!(
        node.controller.calls(),
        vec![Call {
            entry: "index",
            received: Received::Nothing
        }]
    );
    assert_logged(&node, "GET /api/v1/", 200);
}

#[tokio::test]
async fn test_get_task_invokes_list() {
    let node = TestNode::new();

    let res = node
        .router
        .clone()
        .oneshot(request(Method::GET, "/api/v1/task?limit=5"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(node.controller.calls()[0].entry, "list_tasks");
    assert_logged(&node, "GET /api/v1/task?limit=5", 200);
}

#[tokio::test]
async fn test_post_task_passes_cluster_config() {
    let node = TestNode::new();

    let res = node
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/task",
            serde_json::json!({"name": "reindex"}),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        node.controller.calls(),
        vec![Call {
            entry: "add_task",
            received: Received::Config(node.config_addr())
        }]
    );
    assert_logged(&node, "POST /api/v1/task", 200);
}

#[tokio::test]
async fn test_friend_routes_pass_friends_registry() {
    let node = TestNode::new();
    let friend = serde_json::json!({"name": "node-2", "address": "10.0.0.2:8080"});

    for method in [Method::POST, Method::DELETE] {
        let res = node
            .router
            .clone()
            .oneshot(json_request(method, "/api/v1/friend", friend.clone()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert_eq!(
        node.controller.calls(),
        vec![
            Call {
                entry: "add_friend",
                received: Received::Friends(node.friends_addr())
            },
            Call {
                entry: "delete_friend",
                received: Received::Friends(node.friends_addr())
            },
        ]
    );
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let node = TestNode::new();

    let res = node
        .router
        .clone()
        .oneshot(request(Method::GET, "/api/v1/unknown"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(node.controller.calls().is_empty());
    assert_logged(&node, "GET /api/v1/unknown", 404);
}

#[tokio::test]
async fn test_unregistered_verb_is_not_found() {
    let node = TestNode::new();

    let res = node
        .router
        .clone()
        .oneshot(json_request(Method::PUT, "/api/v1/task", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(node.controller.calls().is_empty());
    assert_logged(&node, "PUT /api/v1/task", 404);
}

#[tokio::test]
async fn test_path_outside_prefix_is_not_found() {
    let node = TestNode::new();

    for uri in ["/task", "/api/v1x/task", "/API/V1/task"] {
        let res = node
            .router
            .clone()
            .oneshot(request(Method::GET, uri))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }
    assert!(node.controller.calls().is_empty());
}

#[tokio::test]
async fn test_paths_are_normalized() {
    let node = TestNode::new();

    for uri in ["/api/v1", "/api/v1//task/", "/api//v1/task"] {
        let res = node
            .router
            .clone()
            .oneshot(request(Method::GET, uri))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
    }

    let entries: Vec<&str> = node.controller.calls().iter().map(|c| c.entry).collect();
    assert_eq!(entries, vec!["index", "list_tasks", "list_tasks"]);
}

#[tokio::test]
async fn test_wrong_content_type_is_unsupported() {
    let node = TestNode::new();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/task")
        .header(header::CONTENT_TYPE, "text/plain")
        .extension(axum::extract::ConnectInfo(common::remote()))
        .body(Body::from("reindex"))
        .unwrap();
    let res = node.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_json(res).await["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert!(node.controller.calls().is_empty());
    assert_logged(&node, "POST /api/v1/task", 415);
}

#[tokio::test]
async fn test_json_with_charset_is_accepted() {
    let node = TestNode::new();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/friend")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .header(header::ACCEPT, "text/html, application/*;q=0.8")
        .extension(axum::extract::ConnectInfo(common::remote()))
        .body(Body::from(r#"{"name":"n","address":"a"}"#))
        .unwrap();
    let res = node.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unacceptable_accept_header() {
    let node = TestNode::new();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/")
        .header(header::ACCEPT, "text/html")
        .extension(axum::extract::ConnectInfo(common::remote()))
        .body(Body::empty())
        .unwrap();
    let res = node.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);
    assert!(node.controller.calls().is_empty());
    assert_logged(&node, "GET /api/v1/", 406);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let node = TestNode::with_listener(ListenerConfig {
        max_body_size: 16,
        ..ListenerConfig::default()
    });

    let res = node
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/task",
            serde_json::json!({"name": "a task name well past sixteen bytes"}),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(node.controller.calls().is_empty());
    assert_logged(&node, "POST /api/v1/task", 413);
}

#[tokio::test]
async fn test_missing_peer_address_logs_unknown() {
    let node = TestNode::new();

    let req = Request::builder()
        .uri("/api/v1/")
        .body(Body::empty())
        .unwrap();
    let res = node.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let lines = node.sink.lines();
    assert!(lines[0].ends_with("request from: unknown"), "{}", lines[0]);
    assert!(lines[1].contains("Outgoing response to unknown with 200"));
}

/// Panics on every entry point.
struct PanickingController;

impl Controller for PanickingController {
    fn index(&self, _: &ApiRequest, _: &mut ApiResponse) {
        panic!("index exploded");
    }

    fn list_tasks(&self, _: &ApiRequest, _: &mut ApiResponse) {
        panic!("list_tasks exploded");
    }

    fn add_task(&self, _: &ApiRequest, _: &mut ApiResponse, _: &ClusterConfig) {
        panic!("add_task exploded");
    }

    fn add_friend(&self, _: &ApiRequest, _: &mut ApiResponse, _: &Friends) {
        panic!("add_friend exploded");
    }

    fn delete_friend(&self, _: &ApiRequest, _: &mut ApiResponse, _: &Friends) {
        panic!("delete_friend exploded");
    }
}

#[tokio::test]
async fn test_controller_panic_becomes_server_error() {
    let node = TestNode::with_controller(
        Arc::new(PanickingController),
        Arc::new(RecordingController::default()),
        ListenerConfig::default(),
    );

    let res = node
        .router
        .clone()
        .oneshot(request(Method::GET, "/api/v1/task"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res).await["code"], "INTERNAL_ERROR");
    assert_logged(&node, "GET /api/v1/task", 500);
}

#[tokio::test]
async fn test_concurrent_requests_do_not_cross_talk() {
    let node = Arc::new(TestNode::new());
    let friend = serde_json::json!({"name": "node-2", "address": "10.0.0.2:8080"});
    let routes = [
        (Method::GET, "/api/v1/", "index"),
        (Method::GET, "/api/v1/task", "list_tasks"),
        (Method::POST, "/api/v1/task", "add_task"),
        (Method::POST, "/api/v1/friend", "add_friend"),
        (Method::DELETE, "/api/v1/friend", "delete_friend"),
    ];
    let mut set = tokio::task::JoinSet::new();

    for i in 0..50 {
        let (method, uri, entry) = routes[i % routes.len()].clone();
        let req = match entry {
            "add_task" => json_request(method, uri, serde_json::json!({ "name": format!("task-{i}") })),
            "add_friend" | "delete_friend" => json_request(method, uri, friend.clone()),
            _ => request(method, uri),
        };
        let router = node.router.clone();
        set.spawn(async move {
            let res = router.oneshot(req).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            let expected = match entry {
                "add_task" => format!("add_task:task-{i}"),
                other => other.to_string(),
            };
            assert_eq!(body_json(res).await["message"], expected);
        });
    }
    while let Some(result) = set.join_next().await {
        result.unwrap();
    }

    let calls = node.controller.calls();
    assert_eq!(calls.len(), 50);
    for (_, _, entry) in &routes {
        let expected = match *entry {
            "add_task" => Received::Config(node.config_addr()),
            "add_friend" | "delete_friend" => Received::Friends(node.friends_addr()),
            _ => Received::Nothing,
        };
        let matching: Vec<&Call> = calls.iter().filter(|c| c.entry == *entry).collect();
        assert_eq!(matching.len(), 10, "{entry}");
        assert!(matching.iter().all(|c| c.received == expected), "{entry}");
    }

    let lines = node.sink.lines();
    assert_eq!(lines.len(), 100);
    let incoming = lines.iter().filter(|l| l.contains("] Incoming ")).count();
    let outgoing = lines.iter().filter(|l| l.contains("] Outgoing ")).count();
    assert_eq!((incoming, outgoing), (50, 50));
}

#[test]
fn test_duplicate_registration_fails() {
    let mut table = RouteTable::new("/api/v1");
    table
        .register(Method::GET, "/task", |_, _| {}, "TaskList")
        .unwrap();

    let err = table
        .register(Method::GET, "/task/", |_, _| {}, "TaskList")
        .unwrap_err();
    assert_eq!(
        err,
        RouteError::Duplicate {
            method: Method::GET,
            path: "/task".to_string()
        }
    );
}

#[test]
fn test_route_tables_share_one_handler() {
    let handler = Arc::new(
        ApiHandler::builder()
            .config(Arc::new(ClusterConfig::default()))
            .friends(Arc::new(Friends::new()))
            .controller(Arc::new(RecordingController::default()))
            .build()
            .unwrap(),
    );

    let first = api::create_route_table(Arc::clone(&handler)).unwrap();
    let second = api::create_route_table(Arc::clone(&handler)).unwrap();
    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 5);
    // Each table holds one clone per route.
    assert_eq!(Arc::strong_count(&handler), 11);
}
