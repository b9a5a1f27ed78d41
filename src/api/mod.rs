//! The node's versioned JSON API.
//!
//! # Routes
//! ```text
//! GET    /api/v1/        → handle_get_root      → Controller::index
//! GET    /api/v1/task    → handle_task_list     → Controller::list_tasks
//! POST   /api/v1/task    → handle_task_add      → Controller::add_task(config)
//! POST   /api/v1/friend  → handle_friend_post   → Controller::add_friend(friends)
//! DELETE /api/v1/friend  → handle_friend_delete → Controller::delete_friend(friends)
//! ```

pub mod handler;
pub mod models;

use std::any::type_name;
use std::sync::Arc;

use axum::http::Method;

use crate::http::middleware::{FilterChain, LoggingFilter, MetricsFilter};
use crate::http::{ApiRequest, ApiResponse, Dispatcher};
use crate::observability::LogSink;
use crate::routing::{RouteError, RouteTable};

pub use handler::{ApiHandler, ApiHandlerBuilder, CollaboratorUnavailable};
pub use models::{FriendRef, NewTask, StatusResponse, TaskList};

/// Prefix shared by every route.
pub const API_PREFIX: &str = "/api/v1";

type HandlerMethod = fn(&ApiHandler, &ApiRequest, &mut ApiResponse);

/// Bind one façade method to a shared handler.
fn bind(
    handler: &Arc<ApiHandler>,
    method: HandlerMethod,
) -> impl Fn(&ApiRequest, &mut ApiResponse) + Send + Sync + 'static {
    let handler = Arc::clone(handler);
    move |request: &ApiRequest, response: &mut ApiResponse| method(&handler, request, response)
}

/// Register the API routes against `handler`.
pub fn create_route_table(handler: Arc<ApiHandler>) -> Result<RouteTable, RouteError> {
    let mut table = RouteTable::new(API_PREFIX);

    table.register(
        Method::GET,
        "/",
        bind(&handler, ApiHandler::handle_get_root),
        type_name::<StatusResponse>(),
    )?;
    table.register(
        Method::GET,
        "/task",
        bind(&handler, ApiHandler::handle_task_list),
        type_name::<TaskList>(),
    )?;
    table.register(
        Method::POST,
        "/task",
        bind(&handler, ApiHandler::handle_task_add),
        type_name::<StatusResponse>(),
    )?;
    table.register(
        Method::POST,
        "/friend",
        bind(&handler, ApiHandler::handle_friend_post),
        type_name::<StatusResponse>(),
    )?;
    table.register(
        Method::DELETE,
        "/friend",
        bind(&handler, ApiHandler::handle_friend_delete),
        type_name::<StatusResponse>(),
    )?;

    Ok(table)
}

/// Assemble the route table and the filter chain.
///
/// Logging is the outermost filter so it observes every outcome.
pub fn create_dispatcher(
    handler: Arc<ApiHandler>,
    sink: Arc<dyn LogSink>,
) -> Result<Dispatcher, RouteError> {
    let table = create_route_table(handler)?;
    for route in table.routes() {
        tracing::debug!(method = %route.method(), path = %route.full_path(), writes = route.writes(), "Route registered");
    }

    let filters = FilterChain::new()
        .with(LoggingFilter::new(sink))
        .with(MetricsFilter);

    Ok(Dispatcher::new(Arc::new(table), filters))
}
