//! Message consume: receive one message, publish it, delete it.

use crate::recorder::Completion;
use crate::session::QueueDirectory;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lf_error::Result;
use lf_traits::{AttributeValue, QueueClient, ReceiveRequest};
use lf_types::{SqsConsumeSettings, Variables};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const NO_MESSAGES: &str = "No messages received.";
pub const RECEIVED: &str = "Message and attributes received successfully.";

/// Receive at most one message.
///
/// On a delivery the body and attributes are written to the configured
/// variables, then the message is deleted with its receipt handle. The
/// iteration only succeeds once the delete has succeeded.
pub async fn consume(
    client: &dyn QueueClient,
    queues: &mut QueueDirectory,
    settings: &SqsConsumeSettings,
    vars: &mut Variables,
) -> Result<Completion> {
    let queue_url = queues.resolve(client, &settings.queue).await?;

    let request = ReceiveRequest {
        queue_url,
        max_messages: 1,
        wait_time_seconds: settings.wait_time_seconds,
        visibility_timeout: settings.visibility_timeout,
    };

    let Some(message) = client.receive(&request).await?.into_iter().next() else {
        debug!(queue = %settings.queue, "No messages received");
        return Ok(Completion::new(NO_MESSAGES));
    };

    info!(
        queue = %settings.queue,
        message_id = ?message.message_id,
        "Message received: {}",
        message.body
    );
    vars.put(&settings.body_variable, message.body.as_str());
    vars.put(
        &settings.attributes_variable,
        attributes_to_json(&message.attributes),
    );

    client
        .delete(&request.queue_url, &message.receipt_handle)
        .await?;
    debug!(queue = %settings.queue, message_id = ?message.message_id, "Message deleted");

    let bytes = message.body.len() as u64;
    Ok(Completion::new(RECEIVED)
        .with_data(message.body)
        .with_bytes(bytes))
}

/// Serialize attributes as a flat JSON object; binary values are base64.
pub fn attributes_to_json(attributes: &BTreeMap<String, AttributeValue>) -> String {
    let object: serde_json::Map<String, serde_json::Value> = attributes
        .iter()
        .map(|(name, value)| {
            let text = match value {
                AttributeValue::Text(s) => s.clone(),
                AttributeValue::Binary(b) => STANDARD.encode(b),
            };
            (name.clone(), serde_json::Value::String(text))
        })
        .collect();
    serde_json::Value::Object(object).to_string()
}
