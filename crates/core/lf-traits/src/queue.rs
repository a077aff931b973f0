//! Message queue capability and related types.

use async_trait::async_trait;
use bytes::Bytes;
use lf_error::Result;
use std::collections::BTreeMap;

/// Message queue operations used by the produce and consume executors.
///
/// Implementations never retry. A remote failure is returned as
/// [`LfError::Remote`](lf_error::LfError::Remote) with the service's code and
/// message.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Resolves a queue name to its URL.
    async fn resolve_queue_url(&self, queue_name: &str) -> Result<String>;

    /// Receives up to `request.max_messages` messages (long-polling).
    ///
    /// An empty vector means the wait time elapsed with nothing available.
    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>>;

    /// Deletes one delivery of a message.
    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<()>;

    /// Sends one message, returning the assigned message id.
    async fn send(&self, queue_url: &str, message: &OutgoingMessage) -> Result<String>;
}

/// Parameters of a receive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveRequest {
    pub queue_url: String,
    pub max_messages: i32,
    pub wait_time_seconds: i32,
    pub visibility_timeout: i32,
}

/// A message attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// `String` and `Number` attributes
    Text(String),
    /// `Binary` attributes
    Binary(Bytes),
}

/// A message as delivered by the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message_id: Option<String>,

    /// Token identifying this delivery, needed for delete
    pub receipt_handle: String,

    pub body: String,

    /// User-defined message attributes
    pub attributes: BTreeMap<String, AttributeValue>,
}

/// A message to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub body: String,
    pub attributes: BTreeMap<String, String>,
    pub group_id: Option<String>,
    pub deduplication_id: Option<String>,
    pub delay_seconds: i32,
}
