//! Object storage capability and related types.

use async_trait::async_trait;
use bytes::Bytes;
use lf_error::Result;
use std::fmt;
use std::path::Path;
use tokio::io::AsyncRead;

/// Object storage operations used by the upload and download executors.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Uploads a local file as one object in a single call.
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> Result<PutResult>;

    /// Fetches a whole object into memory.
    async fn get_bytes(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Opens an object for streaming.
    ///
    /// Errors while reading the returned stream are local transport errors
    /// from the caller's point of view.
    async fn get_stream(&self, bucket: &str, key: &str) -> Result<ObjectStream>;
}

/// Result of a put.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutResult {
    pub e_tag: Option<String>,
    /// Bytes uploaded
    pub bytes: u64,
}

/// An object body being streamed.
pub struct ObjectStream {
    /// Length declared by the service, if any
    pub content_length: Option<u64>,

    pub reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl ObjectStream {
    pub fn new(content_length: Option<u64>, reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            content_length,
            reader: Box::new(reader),
        }
    }
}

impl fmt::Debug for ObjectStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStream")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}
