//! Message produce.

use crate::recorder::Completion;
use crate::session::QueueDirectory;
use lf_error::Result;
use lf_traits::{OutgoingMessage, QueueClient};
use lf_types::SqsProduceSettings;
use tracing::debug;

pub const SENT: &str = "Message sent successfully.";

/// Send one message; the assigned message id becomes the response data.
pub async fn produce(
    client: &dyn QueueClient,
    queues: &mut QueueDirectory,
    settings: &SqsProduceSettings,
) -> Result<Completion> {
    let queue_url = queues.resolve(client, &settings.queue).await?;

    let message = OutgoingMessage {
        body: settings.body.clone(),
        attributes: settings.attributes.clone(),
        group_id: settings.group_id.clone(),
        deduplication_id: settings.deduplication_id.clone(),
        delay_seconds: settings.delay_seconds,
    };

    let message_id = client.send(&queue_url, &message).await?;
    debug!(queue = %settings.queue, message_id = %message_id, "Message sent");

    Ok(Completion::new(SENT)
        .with_data(message_id)
        .with_bytes(message.body.len() as u64))
}
