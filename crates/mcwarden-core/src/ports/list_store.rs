//! Flat-list persistence port for operator and ban entries.

use async_trait::async_trait;

use super::StoreError;

/// Order-preserving list store, last write wins.
///
/// The game server writes the same files on its own, so implementations
/// must tolerate concurrent external edits: read fresh every time and
/// replace the whole list on write.
#[async_trait]
pub trait ListStore<T>: Send + Sync
where
    T: Send + Sync,
{
    /// Read the full list. A missing backing file is an empty list.
    async fn read(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the full list.
    async fn write(&self, entries: &[T]) -> Result<(), StoreError>;
}
