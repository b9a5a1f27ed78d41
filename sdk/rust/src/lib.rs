//! Client for the dds-api node.

mod client;

pub use client::{DdsClient, Error, Friend, Reply, StatusResponse, Task, TaskList};
