//! Client factory backed by the AWS SDK.

use super::{S3ObjectStore, SqsQueueClient};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use lf_error::Result;
use lf_traits::{ClientFactory, ObjectStoreClient, QueueClient};
use lf_types::{AwsSettings, CredentialSource};
use tracing::debug;

/// Name reported by static credentials.
const PROVIDER_NAME: &str = "loadflow";

/// Load the shared SDK configuration for a validated identity.
///
/// Retries are disabled so one iteration issues exactly one attempt per call.
/// Nothing here contacts AWS; profile credentials are resolved lazily on the
/// first request.
pub async fn build_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .retry_config(RetryConfig::disabled());

    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    match &settings.credentials {
        CredentialSource::Static {
            access_key_id,
            secret_access_key,
            session_token,
        } => {
            let credentials = aws_sdk_sqs::config::Credentials::new(
                access_key_id,
                secret_access_key,
                session_token.clone(),
                None,
                PROVIDER_NAME,
            );
            loader = loader.credentials_provider(credentials);
        }
        CredentialSource::Profile(profile) => {
            loader = loader.profile_name(profile);
        }
    }

    loader.load().await
}

/// Builds SQS and S3 clients from the AWS SDK.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsClientFactory;

impl AwsClientFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClientFactory for AwsClientFactory {
    async fn queue_client(&self, settings: &AwsSettings) -> Result<Box<dyn QueueClient>> {
        debug!(region = %settings.region, endpoint = ?settings.endpoint_url, "Building SQS client");
        let config = build_sdk_config(settings).await;
        Ok(Box::new(SqsQueueClient::new(aws_sdk_sqs::Client::new(
            &config,
        ))))
    }

    async fn object_store(&self, settings: &AwsSettings) -> Result<Box<dyn ObjectStoreClient>> {
        debug!(region = %settings.region, endpoint = ?settings.endpoint_url, "Building S3 client");
        let config = build_sdk_config(settings).await;

        // Path-style addressing for endpoint overrides (LocalStack, private endpoints)
        let builder = aws_sdk_s3::config::Builder::from(&config);
        let s3_config = if settings.endpoint_url.is_some() {
            builder.force_path_style(true).build()
        } else {
            builder.build()
        };

        Ok(Box::new(S3ObjectStore::new(aws_sdk_s3::Client::from_conf(
            s3_config,
        ))))
    }
}
