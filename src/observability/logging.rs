//! Structured logging and access log sinks.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber
//! - Provide the sinks the request/response log lines are written to
//!
//! # Design Decisions
//! - Sinks are injected, never global, so tests can capture lines
//! - One write per line under a lock: lines never interleave partially
//! - Sink failures are returned to the caller, which decides to drop them

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Target used for request/response log events.
pub const ACCESS_TARGET: &str = "dds_api::access";

/// Failure to emit a log line.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log sink I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("log sink lock poisoned")]
    Poisoned,
}

/// Destination for access log lines.
pub trait LogSink: Send + Sync {
    /// Emit one complete line (without trailing newline).
    fn emit(&self, line: &str) -> Result<(), SinkError>;
}

/// Forwards each line as an INFO event on [`ACCESS_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, line: &str) -> Result<(), SinkError> {
        tracing::info!(target: ACCESS_TARGET, "{line}");
        Ok(())
    }
}

/// Appends lines to a file.
#[derive(Debug)]
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Open (or create) `path` for appending, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn emit(&self, line: &str) -> Result<(), SinkError> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut file = self.file.lock().map_err(|_| SinkError::Poisoned)?;
        file.write_all(buf.as_bytes())?;
        Ok(())
    }
}

/// Keeps lines in memory. Used by tests and diagnostics.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn emit(&self, line: &str) -> Result<(), SinkError> {
        self.lines
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(line.to_string());
        Ok(())
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(
    config: &ObservabilityConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let fallback = format!(
        "dds_api={level},tower_http={level}",
        level = config.log_level
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
