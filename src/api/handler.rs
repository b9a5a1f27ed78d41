//! The API handler: one thin delegation method per route.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::cluster::{ClusterConfig, Friends};
use crate::controller::Controller;
use crate::http::{ApiRequest, ApiResponse};

/// A collaborator was not supplied before building the handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("collaborator '{0}' is not set")]
pub struct CollaboratorUnavailable(pub &'static str);

/// Binds the cluster collaborators to the controller entry points.
///
/// The bindings are fixed at construction and never reassigned.
pub struct ApiHandler {
    config: Arc<ClusterConfig>,
    friends: Arc<Friends>,
    controller: Arc<dyn Controller>,
}

impl fmt::Debug for ApiHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiHandler")
            .field("node", &self.config.node_name)
            .field("friends", &self.friends.len())
            .finish_non_exhaustive()
    }
}

impl ApiHandler {
    pub fn builder() -> ApiHandlerBuilder {
        ApiHandlerBuilder::default()
    }

    pub fn handle_get_root(&self, request: &ApiRequest, response: &mut ApiResponse) {
        self.controller.index(request, response);
    }

    pub fn handle_task_list(&self, request: &ApiRequest, response: &mut ApiResponse) {
        self.controller.list_tasks(request, response);
    }

    pub fn handle_task_add(&self, request: &ApiRequest, response: &mut ApiResponse) {
        self.controller.add_task(request, response, &self.config);
    }

    pub fn handle_friend_post(&self, request: &ApiRequest, response: &mut ApiResponse) {
        self.controller.add_friend(request, response, &self.friends);
    }

    pub fn handle_friend_delete(&self, request: &ApiRequest, response: &mut ApiResponse) {
        self.controller.delete_friend(request, response, &self.friends);
    }
}

/// Collects the collaborators; `build` refuses to run without all of them.
#[derive(Default)]
pub struct ApiHandlerBuilder {
    config: Option<Arc<ClusterConfig>>,
    friends: Option<Arc<Friends>>,
    controller: Option<Arc<dyn Controller>>,
}

impl ApiHandlerBuilder {
    pub fn config(mut self, config: Arc<ClusterConfig>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn friends(mut self, friends: Arc<Friends>) -> Self {
        self.friends = Some(friends);
        self
    }

    pub fn controller(mut self, controller: Arc<dyn Controller>) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn build(self) -> Result<ApiHandler, CollaboratorUnavailable> {
        Ok(ApiHandler {
            config: self.config.ok_or(CollaboratorUnavailable("config"))?,
            friends: self.friends.ok_or(CollaboratorUnavailable("friends"))?,
            controller: self
                .controller
                .ok_or(CollaboratorUnavailable("controller"))?,
        })
    }
}
