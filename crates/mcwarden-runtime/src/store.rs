//! JSON file implementation of the [`ListStore`] port.
//!
//! Backs `ops.json` and `banned-players.json`. The game server rewrites
//! these files itself, so every read goes to disk and every write replaces
//! the whole file.

use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mcwarden_core::{BanEntry, ListStore, OperatorEntry, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// File name of the operator list inside the server directory.
pub const OPS_FILE: &str = "ops.json";

/// File name of the ban list inside the server directory.
pub const BANS_FILE: &str = "banned-players.json";

/// A JSON array of `T` stored in one file.
pub struct JsonListStore<T> {
    path: PathBuf,
    _entry: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _entry: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn serde_error(&self, e: &serde_json::Error) -> StoreError {
        StoreError::Serialization {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }
}

impl<T> Clone for JsonListStore<T> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<T> fmt::Debug for JsonListStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonListStore")
            .field("path", &self.path)
            .finish()
    }
}

/// Operator list at `server_dir/ops.json`.
pub fn operator_store(server_dir: &Path) -> JsonListStore<OperatorEntry> {
    JsonListStore::new(server_dir.join(OPS_FILE))
}

/// Ban list at `server_dir/banned-players.json`.
pub fn ban_store(server_dir: &Path) -> JsonListStore<BanEntry> {
    JsonListStore::new(server_dir.join(BANS_FILE))
}

#[async_trait]
impl<T> ListStore<T> for JsonListStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn read(&self) -> Result<Vec<T>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| self.serde_error(&e))
    }

    async fn write(&self, entries: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| self.serde_error(&e))?;

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), entries = entries.len(), "List written");
        Ok(())
    }
}
