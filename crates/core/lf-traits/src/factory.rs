//! Client factory trait.

use crate::object_store::ObjectStoreClient;
use crate::queue::QueueClient;
use async_trait::async_trait;
use lf_error::Result;
use lf_types::AwsSettings;

/// Builds service clients from a validated identity.
///
/// Building a client must not perform a remote call; reachability is
/// discovered by the first real operation.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Builds a message queue client.
    async fn queue_client(&self, settings: &AwsSettings) -> Result<Box<dyn QueueClient>>;

    /// Builds an object storage client.
    async fn object_store(&self, settings: &AwsSettings) -> Result<Box<dyn ObjectStoreClient>>;
}
