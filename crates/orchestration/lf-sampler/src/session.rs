//! Worker sessions: scoped acquisition and release of one user's client.

use crate::executor;
use crate::recorder::SampleRecorder;
use anyhow::anyhow;
use lf_error::{LfError, Result};
use lf_traits::{ClientFactory, ObjectStoreClient, QueueClient};
use lf_types::{
    AwsSettings, OperationKind, OperationSettings, RuntimeParameters, SampleOutcome, Variables,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// An opened client, owned by exactly one worker.
pub enum ClientHandle {
    Queue(Box<dyn QueueClient>),
    ObjectStore(Box<dyn ObjectStoreClient>),
    Closed,
}

impl ClientHandle {
    /// Release the client. Returns false if it was already closed.
    pub fn close(&mut self) -> bool {
        match std::mem::replace(self, Self::Closed) {
            Self::Queue(_) => {
                info!("Close SQS Client.");
                true
            }
            Self::ObjectStore(_) => {
                info!("Close S3 Client.");
                true
            }
            Self::Closed => false,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Cache of queue name to queue URL, one lookup per name per session.
///
/// Values that already look like URLs are used as-is.
#[derive(Debug, Default)]
pub struct QueueDirectory {
    urls: HashMap<String, String>,
}

impl QueueDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a queue name, asking the client only on a cache miss.
    pub async fn resolve(&mut self, client: &dyn QueueClient, queue: &str) -> Result<String> {
        if queue.starts_with("https://") || queue.starts_with("http://") {
            return Ok(queue.to_string());
        }
        if let Some(url) = self.urls.get(queue) {
            return Ok(url.clone());
        }

        let url = client.resolve_queue_url(queue).await?;
        debug!(queue = %queue, url = %url, "Resolved queue URL");
        self.urls.insert(queue.to_string(), url.clone());
        Ok(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// One virtual user's configuration and client, alive from setup to teardown.
pub struct WorkerSession {
    worker_id: usize,
    settings: OperationSettings,
    label: String,
    handle: ClientHandle,
    queues: QueueDirectory,
}

impl WorkerSession {
    /// Parse the parameters and open the client.
    ///
    /// All parameters are validated before the factory is called, so an
    /// invalid configuration never produces a client or a remote call.
    pub async fn setup(
        worker_id: usize,
        kind: OperationKind,
        params: &RuntimeParameters,
        factory: &dyn ClientFactory,
    ) -> Result<Self> {
        for (name, value) in params.masked() {
            info!(worker = worker_id, "{}: {}", name, value);
        }

        let settings = OperationSettings::from_params(kind, params)?;
        let aws = AwsSettings::from_params(params)?;

        let handle = if kind.is_queue() {
            ClientHandle::Queue(factory.queue_client(&aws).await?)
        } else {
            ClientHandle::ObjectStore(factory.object_store(&aws).await?)
        };

        info!(worker = worker_id, operation = %kind, region = %aws.region, "Session started");

        Ok(Self {
            worker_id,
            label: settings.label(),
            settings,
            handle,
            queues: QueueDirectory::new(),
        })
    }

    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    pub fn kind(&self) -> OperationKind {
        self.settings.kind()
    }

    pub fn settings(&self) -> &OperationSettings {
        &self.settings
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Run one iteration and record its outcome.
    pub async fn execute(&mut self, vars: &mut Variables) -> SampleOutcome {
        let recorder = SampleRecorder::start(self.settings.kind(), self.label.clone());

        let result = match (&self.settings, &self.handle) {
            (OperationSettings::SqsConsume(s), ClientHandle::Queue(client)) => {
                executor::consume(client.as_ref(), &mut self.queues, s, vars).await
            }
            (OperationSettings::SqsProduce(s), ClientHandle::Queue(client)) => {
                executor::produce(client.as_ref(), &mut self.queues, s).await
            }
            (OperationSettings::S3Upload(s), ClientHandle::ObjectStore(client)) => {
                executor::upload(client.as_ref(), s).await
            }
            (OperationSettings::S3Download(s), ClientHandle::ObjectStore(client)) => {
                executor::download(client.as_ref(), s).await
            }
            (_, ClientHandle::Closed) => Err(LfError::Other(anyhow!(
                "worker {} has no open client",
                self.worker_id
            ))),
            (settings, _) => Err(LfError::Other(anyhow!(
                "client does not support {}",
                settings.kind()
            ))),
        };

        let outcome = recorder.finish(result);
        debug!(
            worker = self.worker_id,
            success = outcome.success,
            elapsed_ms = outcome.elapsed_ms() as u64,
            "Iteration finished"
        );
        outcome
    }

    /// Release the client. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.handle.close() {
            debug!(worker = self.worker_id, "Session torn down");
        }
    }
}

impl Drop for WorkerSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
