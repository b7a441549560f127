//! Storage abstractions for the pending-link queue.
//!
//! The queue lives under a single key in a key-value blob store and is
//! stored as a JSON array of links:
//!
//! ```text
//! {store}/
//! └── links_to_process      # ["https://…/job/1", "https://…/job/2", …]
//! ```
//!
//! Plain writes are last-writer-wins. Two overlapping batch invocations can
//! read the same snapshot and lose each other's update; backends that can
//! compare versions implement [`BlobStore::set_if_match`] so a deployment can
//! opt into conditional writes instead.

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::PendingQueue;

// Re-export for convenience
pub use local::LocalStorage;

/// Raw value read from a blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    /// Opaque version tag (ETag, content hash) if the backend has one
    pub version: Option<String>,
}

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was stored
    Written,
    /// The stored value changed since it was read; nothing was written
    Conflict,
}

/// Trait for key-value blob store backends.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a value, or `None` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Blob>>;

    /// Store a value unconditionally.
    async fn set(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Store a value only if the current version still equals `expected`.
    ///
    /// `expected = None` means the key must not exist. Backends without
    /// version support fall back to an unconditional write.
    async fn set_if_match(
        &self,
        key: &str,
        bytes: Vec<u8>,
        expected: Option<&str>,
    ) -> Result<WriteOutcome> {
        let _ = expected;
        self.set(key, bytes).await?;
        Ok(WriteOutcome::Written)
    }
}

/// The pending queue, read with the version it was stored under.
#[derive(Debug, Clone, Default)]
pub struct QueueSnapshot {
    pub queue: PendingQueue,
    pub version: Option<String>,
}

/// Typed access to the pending queue under one fixed key.
#[derive(Clone)]
pub struct QueueStore {
    backend: Arc<dyn BlobStore>,
    key: String,
}

impl QueueStore {
    pub fn new(backend: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the queue; a missing key reads as an empty queue.
    pub async fn read(&self) -> Result<QueueSnapshot> {
        match self.backend.get(&self.key).await? {
            Some(blob) => Ok(QueueSnapshot {
                queue: serde_json::from_slice(&blob.bytes)?,
                version: blob.version,
            }),
            None => Ok(QueueSnapshot::default()),
        }
    }

    /// Overwrite the queue.
    pub async fn write(&self, queue: &PendingQueue) -> Result<()> {
        let bytes = serde_json::to_vec(queue)?;
        self.backend.set(&self.key, bytes).await
    }

    /// Overwrite the queue only if it is still at `version`.
    pub async fn write_if_unchanged(
        &self,
        queue: &PendingQueue,
        version: Option<&str>,
    ) -> Result<WriteOutcome> {
        let bytes = serde_json::to_vec(queue)?;
        self.backend.set_if_match(&self.key, bytes, version).await
    }
}
