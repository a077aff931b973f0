//! Parameter schema and runtime parameters.
//!
//! Every operation declares an ordered list of named parameters with a default
//! value and a description. Callers supply a flat name → string map; the map
//! is merged with the declared defaults and converted into typed settings once,
//! when a worker session starts.

use crate::operation::OperationKind;
use lf_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// AWS region.
pub const AWS_REGION: &str = "aws_region";
/// Static access key id.
pub const AWS_ACCESS_KEY_ID: &str = "aws_access_key_id";
/// Static secret access key.
pub const AWS_SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
/// Session token for temporary credentials.
pub const AWS_SESSION_TOKEN: &str = "aws_session_token";
/// Named profile from the shared AWS config files.
pub const AWS_CONFIGURATION_PROFILE: &str = "aws_configuration_profile";
/// Endpoint override.
pub const AWS_ENDPOINT_URL: &str = "aws_endpoint_url";

pub const SQS_QUEUE_NAME: &str = "sqs_queue_name";
pub const SQS_WAIT_TIME_SECONDS: &str = "sqs_wait_time_seconds";
pub const SQS_VISIBILITY_TIMEOUT: &str = "sqs_visibility_timeout";
pub const SQS_RECEIVED_MESSAGE_BODY_REF_NAME: &str = "sqs_received_message_body_ref_name";
pub const SQS_RECEIVED_MESSAGE_ATTRIBUTES_REF_NAME: &str =
    "sqs_received_message_attributes_ref_name";
pub const SQS_MESSAGE_BODY: &str = "sqs_message_body";
pub const SQS_MESSAGE_ATTRIBUTES: &str = "sqs_message_attributes";
pub const SQS_MESSAGE_GROUP_ID: &str = "sqs_message_group_id";
pub const SQS_MESSAGE_DEDUPLICATION_ID: &str = "sqs_message_deduplication_id";
pub const SQS_DELAY_SECONDS: &str = "sqs_delay_seconds";

pub const S3_BUCKET_NAME: &str = "s3_bucket_name";
pub const S3_OBJECT_KEY: &str = "s3_object_key";
pub const UPLOAD_PATH: &str = "upload_path";
pub const DOWNLOAD_PATH: &str = "download_path";
pub const BUFFER_SIZE: &str = "buffer_size";

/// Default transfer buffer for streaming downloads (1 MiB).
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// A single declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    /// Parameter name
    pub name: &'static str,

    /// Value used when the caller does not supply one
    pub default_value: &'static str,

    /// Description shown by `--describe`
    pub description: &'static str,
}

impl ParamSpec {
    /// Declare a parameter.
    pub const fn new(
        name: &'static str,
        default_value: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            default_value,
            description,
        }
    }
}

const AWS_PARAMETERS: &[ParamSpec] = &[
    ParamSpec::new(AWS_REGION, "", "AWS region (required)"),
    ParamSpec::new(AWS_ACCESS_KEY_ID, "", "Static access key id"),
    ParamSpec::new(AWS_SECRET_ACCESS_KEY, "", "Static secret access key"),
    ParamSpec::new(
        AWS_SESSION_TOKEN,
        "",
        "Session token, only used together with a static key pair",
    ),
    ParamSpec::new(
        AWS_CONFIGURATION_PROFILE,
        "",
        "Profile name from the shared AWS config, used when no static key pair is given",
    ),
    ParamSpec::new(
        AWS_ENDPOINT_URL,
        "",
        "Endpoint override, e.g. a VPC endpoint or http://localhost:4566",
    ),
];

const SQS_CONSUME_PARAMETERS: &[ParamSpec] = &[
    ParamSpec::new(SQS_QUEUE_NAME, "", "Queue name or queue URL"),
    ParamSpec::new(
        SQS_WAIT_TIME_SECONDS,
        "10",
        "Long-poll wait time in seconds (0-20); returns early when a message is available",
    ),
    ParamSpec::new(
        SQS_VISIBILITY_TIMEOUT,
        "30",
        "Seconds the received message stays hidden from other consumers (0-43200)",
    ),
    ParamSpec::new(
        SQS_RECEIVED_MESSAGE_BODY_REF_NAME,
        "received_message_body",
        "Variable that receives the message body",
    ),
    ParamSpec::new(
        SQS_RECEIVED_MESSAGE_ATTRIBUTES_REF_NAME,
        "received_message_attribute",
        "Variable that receives the message attributes as a JSON object",
    ),
];

const SQS_PRODUCE_PARAMETERS: &[ParamSpec] = &[
    ParamSpec::new(SQS_QUEUE_NAME, "", "Queue name or queue URL"),
    ParamSpec::new(SQS_MESSAGE_BODY, "", "Message body"),
    ParamSpec::new(
        SQS_MESSAGE_ATTRIBUTES,
        "{}",
        "Message attributes as a flat JSON object of string values",
    ),
    ParamSpec::new(
        SQS_MESSAGE_GROUP_ID,
        "",
        "Message group id (FIFO queues only)",
    ),
    ParamSpec::new(
        SQS_MESSAGE_DEDUPLICATION_ID,
        "",
        "Deduplication id (FIFO queues without content-based deduplication)",
    ),
    ParamSpec::new(SQS_DELAY_SECONDS, "0", "Delivery delay in seconds (0-900)"),
];

const S3_UPLOAD_PARAMETERS: &[ParamSpec] = &[
    ParamSpec::new(S3_BUCKET_NAME, "", "Bucket name"),
    ParamSpec::new(S3_OBJECT_KEY, "", "Object key inside the bucket"),
    ParamSpec::new(UPLOAD_PATH, "", "Local path of the file to upload"),
];

const S3_DOWNLOAD_PARAMETERS: &[ParamSpec] = &[
    ParamSpec::new(S3_BUCKET_NAME, "", "Bucket name"),
    ParamSpec::new(S3_OBJECT_KEY, "", "Object key inside the bucket"),
    ParamSpec::new(
        DOWNLOAD_PATH,
        "",
        "Local destination path. Empty keeps the whole object in memory instead of streaming it to disk",
    ),
    ParamSpec::new(
        BUFFER_SIZE,
        "1048576",
        "Transfer buffer size in bytes when streaming to a file",
    ),
];

/// The declared parameters of one operation kind.
///
/// The shared AWS identity parameters come first, followed by the
/// operation's own parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSchema {
    kind: OperationKind,
    params: Vec<ParamSpec>,
}

impl OperationSchema {
    /// Build the schema for an operation kind.
    pub fn for_kind(kind: OperationKind) -> Self {
        let own = match kind {
            OperationKind::SqsConsume => SQS_CONSUME_PARAMETERS,
            OperationKind::SqsProduce => SQS_PRODUCE_PARAMETERS,
            OperationKind::S3Upload => S3_UPLOAD_PARAMETERS,
            OperationKind::S3Download => S3_DOWNLOAD_PARAMETERS,
        };

        Self {
            kind,
            params: AWS_PARAMETERS.iter().chain(own.iter()).copied().collect(),
        }
    }

    /// The operation this schema belongs to.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Declared parameters in display order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Look up a declared parameter.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// All declared defaults as runtime parameters.
    pub fn defaults(&self) -> RuntimeParameters {
        self.params
            .iter()
            .map(|p| (p.name, p.default_value))
            .collect()
    }
}

/// Returns true if the parameter holds secret material and must not be logged.
pub fn is_secret(name: &str) -> bool {
    matches!(name, AWS_SECRET_ACCESS_KEY | AWS_SESSION_TOKEN)
}

/// String parameters supplied by the caller.
///
/// Keys the operation does not declare are kept but never read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeParameters(BTreeMap<String, String>);

impl RuntimeParameters {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Set a parameter (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Raw value of a parameter, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns true if the parameter is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fill in declared defaults for every parameter not supplied.
    pub fn with_defaults(&self, schema: &OperationSchema) -> Self {
        let mut merged = self.clone();
        for spec in schema.params() {
            merged
                .0
                .entry(spec.name.to_string())
                .or_insert_with(|| spec.default_value.to_string());
        }
        merged
    }

    /// A non-empty value, or [`ConfigError::Missing`].
    pub fn require(&self, name: &str) -> Result<&str, ConfigError> {
        self.optional(name)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))
    }

    /// A value that is present and not blank.
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.trim().is_empty())
    }

    /// Parse a required integer and check it against an inclusive range.
    pub fn parse_int(&self, name: &str, min: i64, max: i64) -> Result<i64, ConfigError> {
        let raw = self.require(name)?;
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidInteger {
                name: name.to_string(),
                value: raw.to_string(),
            })?;

        if !(min..=max).contains(&value) {
            return Err(ConfigError::OutOfRange {
                name: name.to_string(),
                value,
                min,
                max,
            });
        }

        Ok(value)
    }

    /// Parameters with secret values replaced, for logging.
    pub fn masked(&self) -> Vec<(&str, &str)> {
        self.iter()
            .map(|(k, v)| {
                if is_secret(k) && !v.is_empty() {
                    (k, "********")
                } else {
                    (k, v)
                }
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuntimeParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Extend<(String, String)> for RuntimeParameters {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
