//! Error taxonomy for supervisor and manager operations.
//!
//! Adapters map these to their own representation (HTTP status codes,
//! CLI exit codes).

use std::time::Duration;

use thiserror::Error;

use crate::ports::{ProvisionError, StoreError};

/// Errors surfaced by lifecycle and admin operations.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// `start` while a process already exists.
    #[error("Server is already running")]
    AlreadyRunning,

    /// Operation needs a running server.
    #[error("Server is not running")]
    NotRunning,

    /// Another start/stop/restart is in flight.
    #[error("Another lifecycle operation is in progress")]
    OperationInProgress,

    /// The process exited before printing a ready marker.
    #[error("Server failed to start (exit code: {})", format_exit_code(*exit_code))]
    StartFailed { exit_code: Option<i32> },

    /// No ready marker within the start timeout. The process keeps running.
    #[error("Server start timed out after {}s", .0.as_secs())]
    StartTimeout(Duration),

    /// The executable could not be launched.
    #[error("Failed to spawn server process: {0}")]
    Spawn(#[source] std::io::Error),

    /// Writing to the server console failed.
    #[error("Failed to write to server console: {0}")]
    CommandWrite(#[source] std::io::Error),

    /// Reading an operator or ban list failed.
    #[error(transparent)]
    Persistence(#[from] StoreError),

    /// Preparing the server directory failed.
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// Caller input rejected before reaching the server console.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn format_exit_code(code: Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}
