//! AWS S3 storage implementation.
//!
//! Keys are stored as `{bucket}/{prefix}/{key}`. Versions are S3 ETags, and
//! conditional writes use `If-Match` / `If-None-Match: *`.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use log::info;

use crate::error::{AppError, Result};
use crate::storage::{Blob, BlobStore, WriteOutcome};

/// S3-based blob storage.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create S3 storage from environment configuration.
    ///
    /// Credentials come from the default AWS provider chain.
    pub async fn from_env() -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);

        let bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "jobscan-store".to_string());
        let prefix = std::env::var("S3_PREFIX").unwrap_or_else(|_| "jobscan".to_string());

        Ok(Self::new(client, bucket, prefix))
    }

    fn object_key(&self, key: &str) -> String {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}/{key}")
        }
    }

    /// Put an object; `expected` carries the precondition, if any.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        expected: Option<Option<&str>>,
    ) -> Result<WriteOutcome> {
        let object_key = self.object_key(key);
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes))
            .content_type("application/json");

        request = match expected {
            Some(Some(etag)) => request.if_match(etag),
            Some(None) => request.if_none_match("*"),
            None => request,
        };

        match request.send().await {
            Ok(_) => {
                info!("Wrote s3://{}/{}", self.bucket, object_key);
                Ok(WriteOutcome::Written)
            }
            Err(err)
                if matches!(
                    err.code(),
                    Some("PreconditionFailed") | Some("ConditionalRequestConflict")
                ) =>
            {
                info!(
                    "Conditional write to s3://{}/{} rejected",
                    self.bucket, object_key
                );
                Ok(WriteOutcome::Conflict)
            }
            Err(err) => Err(AppError::store(err.into_service_error())),
        }
    }
}

#[async_trait]
impl BlobStore for S3Storage {
    async fn get(&self, key: &str) -> Result<Option<Blob>> {
        let object_key = self.object_key(key);
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let version = output.e_tag().map(str::to_string);
                let bytes = output.body.collect().await.map_err(AppError::store)?;
                Ok(Some(Blob {
                    bytes: bytes.into_bytes().to_vec(),
                    version,
                }))
            }
            Err(err) => {
                // Check if it's a "not found" error
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    info!("No existing data at s3://{}/{}", self.bucket, object_key);
                    Ok(None)
                } else {
                    Err(AppError::store(service_err))
                }
            }
        }
    }

    async fn set(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.put(key, bytes, None).await.map(|_| ())
    }

    async fn set_if_match(
        &self,
        key: &str,
        bytes: Vec<u8>,
        expected: Option<&str>,
    ) -> Result<WriteOutcome> {
        self.put(key, bytes, Some(expected)).await
    }
}
