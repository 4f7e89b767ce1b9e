//! Ports for preparing the server directory before the first start.

use std::path::Path;

use async_trait::async_trait;

use super::{FetchError, ProvisionError};

/// Downloads a remote artifact to a local path.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch `url` into `dest`, following redirects. `dest` is only
    /// replaced once the body has been received completely.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// Prepares binaries and configuration files for the game server.
///
/// Called once before the first start. Must be idempotent: existing
/// artifacts are kept, missing ones are created.
#[async_trait]
pub trait ServerProvisioner: Send + Sync {
    async fn provision(&self) -> Result<(), ProvisionError>;
}

/// Provisioner for setups whose server directory is managed elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProvisioner;

#[async_trait]
impl ServerProvisioner for NoopProvisioner {
    async fn provision(&self) -> Result<(), ProvisionError> {
        Ok(())
    }
}
