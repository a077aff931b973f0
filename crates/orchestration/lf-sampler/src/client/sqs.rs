//! SQS queue client.

use super::remote_error;
use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_sqs::types::MessageAttributeValue;
use aws_sdk_sqs::Client;
use bytes::Bytes;
use lf_error::{LfError, Result};
use lf_traits::{AttributeValue, OutgoingMessage, QueueClient, ReceiveRequest, ReceivedMessage};
use std::collections::BTreeMap;
use tracing::debug;

/// Queue client over the SQS API.
pub struct SqsQueueClient {
    client: Client,
}

impl SqsQueueClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn resolve_queue_url(&self, queue_name: &str) -> Result<String> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(remote_error)?;

        output
            .queue_url()
            .map(str::to_string)
            .ok_or_else(|| LfError::Other(anyhow!("GetQueueUrl returned no URL for {}", queue_name)))
    }

    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<ReceivedMessage>> {
        let output = self
            .client
            .receive_message()
            .queue_url(&request.queue_url)
            .max_number_of_messages(request.max_messages)
            .wait_time_seconds(request.wait_time_seconds)
            .visibility_timeout(request.visibility_timeout)
            .message_attribute_names("All")
            .send()
            .await
            .map_err(remote_error)?;

        let messages = output.messages.unwrap_or_default();
        debug!(count = messages.len(), "Received messages from SQS");

        messages
            .into_iter()
            .map(|msg| {
                let receipt_handle = msg
                    .receipt_handle
                    .ok_or_else(|| LfError::Other(anyhow!("Received message has no receipt handle")))?;

                let attributes = msg
                    .message_attributes
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(name, value)| (name, convert_attribute(value)))
                    .collect::<BTreeMap<_, _>>();

                Ok(ReceivedMessage {
                    message_id: msg.message_id,
                    receipt_handle,
                    body: msg.body.unwrap_or_default(),
                    attributes,
                })
            })
            .collect()
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<()> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    async fn send(&self, queue_url: &str, message: &OutgoingMessage) -> Result<String> {
        let mut request = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(&message.body)
            .set_message_group_id(message.group_id.clone())
            .set_message_deduplication_id(message.deduplication_id.clone());

        // FIFO queues reject per-message delays, so only send a non-zero one
        if message.delay_seconds > 0 {
            request = request.delay_seconds(message.delay_seconds);
        }

        for (name, value) in &message.attributes {
            let attribute = MessageAttributeValue::builder()
                .data_type("String")
                .string_value(value)
                .build()
                .map_err(|e| LfError::Other(anyhow!("Invalid message attribute '{}': {}", name, e)))?;
            request = request.message_attributes(name, attribute);
        }

        let output = request.send().await.map_err(remote_error)?;
        Ok(output.message_id().unwrap_or_default().to_string())
    }
}

fn convert_attribute(value: MessageAttributeValue) -> AttributeValue {
    match (value.string_value, value.binary_value) {
        (Some(text), _) => AttributeValue::Text(text),
        (None, Some(blob)) => AttributeValue::Binary(Bytes::from(blob.into_inner())),
        (None, None) => AttributeValue::Text(String::new()),
    }
}
