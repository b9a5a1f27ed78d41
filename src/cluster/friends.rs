//! Friend (peer node) directory.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A peer node known to this node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    /// Unique peer name.
    pub name: String,
    /// Address the peer's API listens on.
    pub address: String,
}

/// Errors raised by directory mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FriendError {
    #[error("friend '{0}' is already registered")]
    AlreadyExists(String),

    #[error("friend '{0}' is not registered")]
    NotFound(String),
}

/// A thread-safe directory of friends keyed by name.
#[derive(Debug, Default)]
pub struct Friends {
    inner: DashMap<String, Friend>,
}

impl Friends {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a friend. Names are unique.
    pub fn add(&self, friend: Friend) -> Result<(), FriendError> {
        match self.inner.entry(friend.name.clone()) {
            Entry::Occupied(_) => Err(FriendError::AlreadyExists(friend.name)),
            Entry::Vacant(slot) => {
                tracing::info!(name = %friend.name, address = %friend.address, "Friend added");
                slot.insert(friend);
                Ok(())
            }
        }
    }

    /// Remove a friend by name, returning the removed entry.
    pub fn remove(&self, name: &str) -> Result<Friend, FriendError> {
        self.inner
            .remove(name)
            .map(|(_, friend)| {
                tracing::info!(name = %friend.name, "Friend removed");
                friend
            })
            .ok_or_else(|| FriendError::NotFound(name.to_string()))
    }

    /// Look up a friend by name.
    pub fn get(&self, name: &str) -> Option<Friend> {
        self.inner.get(name).map(|r| r.value().clone())
    }

    /// Snapshot of all friends, sorted by name.
    pub fn list(&self) -> Vec<Friend> {
        let mut friends: Vec<Friend> = self.inner.iter().map(|r| r.value().clone()).collect();
        friends.sort_by(|a, b| a.name.cmp(&b.name));
        friends
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
