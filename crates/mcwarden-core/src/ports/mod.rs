//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details.
//!
//! # Design Rules
//!
//! - No process or HTTP types in any signature
//! - Persistence is whole-list read/replace (the game edits the same files)
//! - Provisioning is intent-based ("make the directory runnable")

mod list_store;
mod provisioner;

use std::path::PathBuf;

use thiserror::Error;

pub use list_store::ListStore;
pub use provisioner::{ArtifactFetcher, NoopProvisioner, ServerProvisioner};

/// Errors from a [`ListStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Storage error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file does not contain a valid list.
    #[error("Serialization error at {path}: {message}")]
    Serialization { path: PathBuf, message: String },
}

/// Errors from an [`ArtifactFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("Download of {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// Writing the artifact to disk failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a [`ServerProvisioner`].
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A required artifact could not be downloaded.
    #[error("Failed to fetch {artifact}: {source}")]
    Fetch {
        artifact: String,
        #[source]
        source: FetchError,
    },

    /// A directory or configuration file could not be written.
    #[error("Failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
