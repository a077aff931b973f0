//! S3 object store client.

use super::remote_error;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use lf_error::{Result, TransportError};
use lf_traits::{ObjectStoreClient, ObjectStream, PutResult};
use std::path::Path;

/// Object store over the S3 API.
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStoreClient for S3ObjectStore {
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> Result<PutResult> {
        let bytes = tokio::fs::metadata(path)
            .await
            .map_err(TransportError::from)?
            .len();
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;

        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(remote_error)?;

        Ok(PutResult {
            e_tag: output.e_tag().map(str::to_string),
            bytes,
        })
    }

    async fn get_bytes(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(remote_error)?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        Ok(data.into_bytes())
    }

    async fn get_stream(&self, bucket: &str, key: &str) -> Result<ObjectStream> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(remote_error)?;

        let content_length = output
            .content_length()
            .and_then(|len| u64::try_from(len).ok());

        Ok(ObjectStream::new(
            content_length,
            Box::pin(output.body.into_async_read()),
        ))
    }
}
