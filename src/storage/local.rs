//! Local filesystem storage implementation.
//!
//! Each key is one file under the root directory. Used by the CLI and in
//! tests; Lambda deployments should use `S3Storage`.
//!
//! Versions are the SHA-256 of the file content. The compare in
//! `set_if_match` and the following rename are not atomic across processes,
//! so this only narrows the lost-update window.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{Blob, BlobStore, WriteOutcome};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a key.
    fn path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(AppError::store(format!("invalid key '{key}'")));
        }
        Ok(self.root_dir.join(key))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Content version used for conditional writes.
fn content_version(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[async_trait]
impl BlobStore for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Blob>> {
        let path = self.path(key)?;
        Ok(self.read_bytes(&path).await?.map(|bytes| Blob {
            version: Some(content_version(&bytes)),
            bytes,
        }))
    }

    async fn set(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let path = self.path(key)?;
        self.write_bytes(&path, &bytes).await?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    async fn set_if_match(
        &self,
        key: &str,
        bytes: Vec<u8>,
        expected: Option<&str>,
    ) -> Result<WriteOutcome> {
        let path = self.path(key)?;
        let current = self
            .read_bytes(&path)
            .await?
            .map(|existing| content_version(&existing));

        if current.as_deref() != expected {
            log::warn!(
                "Conditional write to {} rejected: expected version {:?}, found {:?}",
                path.display(),
                expected,
                current
            );
            return Ok(WriteOutcome::Conflict);
        }

        self.write_bytes(&path, &bytes).await?;
        Ok(WriteOutcome::Written)
    }
}
