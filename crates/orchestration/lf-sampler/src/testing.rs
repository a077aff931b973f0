//! In-memory clients for unit tests. Every call is recorded for inspection.

use async_trait::async_trait;
use bytes::Bytes;
use lf_error::{LfError, RemoteError, Result};
use lf_traits::{
    ClientFactory, ObjectStoreClient, ObjectStream, OutgoingMessage, PutResult, QueueClient,
    ReceiveRequest, ReceivedMessage,
};
use lf_types::AwsSettings;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};

#[derive(Default)]
pub struct QueueState {
    pub inbox: Mutex<VecDeque<ReceivedMessage>>,
    pub resolve_calls: Mutex<Vec<String>>,
    pub receive_calls: Mutex<Vec<ReceiveRequest>>,
    pub deletes: Mutex<Vec<(String, String)>>,
    pub sent: Mutex<Vec<(String, OutgoingMessage)>>,
    pub receive_error: Mutex<Option<RemoteError>>,
    pub delete_error: Mutex<Option<RemoteError>>,
    /// Delay applied to the next send only
    pub stall_next_send: Mutex<Option<Duration>>,
}

#[derive(Clone, Default)]
pub struct MockQueue {
    pub state: Arc<QueueState>,
}

impl MockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: ReceivedMessage) {
        self.state.inbox.lock().push_back(message);
    }
}

#[async_trait]
impl QueueClient for MockQueue {
    async fn resolve_queue_url(&self, queue_name: &str) -> Result<String> {
        self.state.resolve_calls.lock().push(queue_name.to_string());
        Ok(format!("https://sqs.us-east-1.amazonaws.com/000000000000/{}", queue_name))
    }

    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>> {
        self.state.receive_calls.lock().push(request.clone());
        if let Some(e) = self.state.receive_error.lock().clone() {
            return Err(e.into());
        }
        let mut inbox = self.state.inbox.lock();
        let take = (request.max_messages.max(0) as usize).min(inbox.len());
        Ok(inbox.drain(..take).collect())
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<()> {
        if let Some(e) = self.state.delete_error.lock().clone() {
            return Err(e.into());
        }
        self.state
            .deletes
            .lock()
            .push((queue_url.to_string(), receipt_handle.to_string()));
        Ok(())
    }

    async fn send(&self, queue_url: &str, message: &OutgoingMessage) -> Result<String> {
        let stall = self.state.stall_next_send.lock().take();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
        let mut sent = self.state.sent.lock();
        sent.push((queue_url.to_string(), message.clone()));
        Ok(format!("msg-{}", sent.len()))
    }
}

/// How the mock store serves streamed bodies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamMode {
    #[default]
    Normal,
    /// Declare more bytes than the body has
    Truncated,
    /// Fail after the first read
    Broken,
}

#[derive(Default)]
pub struct StoreState {
    pub objects: Mutex<HashMap<(String, String), Bytes>>,
    pub puts: Mutex<Vec<(String, String, PathBuf)>>,
    pub gets: AtomicUsize,
    pub error: Mutex<Option<RemoteError>>,
    pub stream_mode: Mutex<StreamMode>,
}

#[derive(Clone, Default)]
pub struct MockStore {
    pub state: Arc<StoreState>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        self.state
            .objects
            .lock()
            .insert((bucket.to_string(), key.to_string()), data.into());
    }

    fn lookup(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.state.gets.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.state.error.lock().clone() {
            return Err(e.into());
        }
        self.state
            .objects
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| {
                LfError::from(RemoteError::new("NoSuchKey", "The specified key does not exist."))
            })
    }
}

#[async_trait]
impl ObjectStoreClient for MockStore {
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> Result<PutResult> {
        self.state
            .puts
            .lock()
            .push((bucket.to_string(), key.to_string(), path.to_path_buf()));
        if let Some(e) = self.state.error.lock().clone() {
            return Err(e.into());
        }
        let data = tokio::fs::read(path)
            .await
            .map_err(lf_error::TransportError::from)?;
        let bytes = data.len() as u64;
        self.insert(bucket, key, data);
        Ok(PutResult {
            e_tag: Some("\"mock\"".to_string()),
            bytes,
        })
    }

    async fn get_bytes(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.lookup(bucket, key)
    }

    async fn get_stream(&self, bucket: &str, key: &str) -> Result<ObjectStream> {
        let data = self.lookup(bucket, key)?;
        let len = data.len() as u64;
        Ok(match *self.state.stream_mode.lock() {
            StreamMode::Normal => ObjectStream::new(Some(len), io::Cursor::new(data)),
            StreamMode::Truncated => ObjectStream::new(Some(len + 10), io::Cursor::new(data)),
            StreamMode::Broken => ObjectStream::new(Some(len), BrokenReader { served: false }),
        })
    }
}

/// Serves one byte, then fails.
struct BrokenReader {
    served: bool,
}

impl AsyncRead for BrokenReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.served {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        self.served = true;
        buf.put_slice(b"x");
        Poll::Ready(Ok(()))
    }
}

/// Factory handing out clones of shared mock clients.
#[derive(Default)]
pub struct MockFactory {
    pub queue: MockQueue,
    pub store: MockStore,
    queue_builds: AtomicUsize,
    store_builds: AtomicUsize,
    pub fail_with: Mutex<Option<RemoteError>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_builds(&self) -> usize {
        self.queue_builds.load(Ordering::SeqCst)
    }

    pub fn store_builds(&self) -> usize {
        self.store_builds.load(Ordering::SeqCst)
    }

    pub fn builds(&self) -> usize {
        self.queue_builds() + self.store_builds()
    }
}

#[async_trait]
impl ClientFactory for MockFactory {
    async fn queue_client(&self, _settings: &AwsSettings) -> Result<Box<dyn QueueClient>> {
        self.queue_builds.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.fail_with.lock().clone() {
            return Err(e.into());
        }
        Ok(Box::new(self.queue.clone()))
    }

    async fn object_store(&self, _settings: &AwsSettings) -> Result<Box<dyn ObjectStoreClient>> {
        self.store_builds.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.fail_with.lock().clone() {
            return Err(e.into());
        }
        Ok(Box::new(self.store.clone()))
    }
}

/// Captures formatted log lines at INFO and above.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install as the thread's default subscriber for the guard's lifetime.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
