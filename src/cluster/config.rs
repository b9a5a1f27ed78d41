//! Cluster node settings.

use serde::{Deserialize, Serialize};

/// Settings describing this node's place in the cluster.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Name this node is known by among its friends.
    pub node_name: String,

    /// Address peers should use to reach this node.
    pub advertise_address: String,

    /// Peer that receives new tasks when a request names no target.
    /// Falls back to `node_name` when unset.
    pub default_target: Option<String>,

    /// Upper bound on tasks held by this node.
    pub max_tasks: usize,
}

impl ClusterConfig {
    /// Resolve the node a new task is scheduled on.
    pub fn resolve_target<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .filter(|t| !t.trim().is_empty())
            .or(self.default_target.as_deref())
            .unwrap_or(&self.node_name)
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            node_name: "node-1".to_string(),
            advertise_address: "127.0.0.1:8080".to_string(),
            default_target: None,
            max_tasks: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target_precedence() {
        let mut config = ClusterConfig::default();
        assert_eq!(config.resolve_target(None), "node-1");
        assert_eq!(config.resolve_target(Some("")), "node-1");

        config.default_target = Some("node-7".into());
        assert_eq!(config.resolve_target(None), "node-7");
        assert_eq!(config.resolve_target(Some("node-3")), "node-3");
    }
}
