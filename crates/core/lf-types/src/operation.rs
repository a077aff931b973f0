//! Operation kinds and their typed settings.

use crate::params::{self, OperationSchema, RuntimeParameters};
use lf_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Upper bound of the SQS long-poll wait time.
pub const MAX_WAIT_TIME_SECONDS: i64 = 20;

/// Upper bound of the SQS visibility timeout (12 hours).
pub const MAX_VISIBILITY_TIMEOUT: i64 = 43_200;

/// Upper bound of the SQS delivery delay (15 minutes).
pub const MAX_DELAY_SECONDS: i64 = 900;

/// Upper bound of the streaming transfer buffer (1 GiB).
pub const MAX_BUFFER_SIZE: i64 = 1 << 30;

/// The supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    /// Receive one message, publish it to variables, delete it
    SqsConsume,
    /// Send one message
    SqsProduce,
    /// Put a local file as an object
    S3Upload,
    /// Get an object into memory or onto disk
    S3Download,
}

impl OperationKind {
    /// Every operation kind, in display order.
    pub const ALL: [OperationKind; 4] = [
        Self::SqsConsume,
        Self::SqsProduce,
        Self::S3Upload,
        Self::S3Download,
    ];

    /// Kebab-case name used on the command line and in outcomes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SqsConsume => "sqs-consume",
            Self::SqsProduce => "sqs-produce",
            Self::S3Upload => "s3-upload",
            Self::S3Download => "s3-download",
        }
    }

    /// Parameter schema for this kind.
    pub fn schema(&self) -> OperationSchema {
        OperationSchema::for_kind(*self)
    }

    /// Returns true for the message queue family.
    pub fn is_queue(&self) -> bool {
        matches!(self, Self::SqsConsume | Self::SqsProduce)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownOperation(s.to_string()))
    }
}

/// Settings for [`OperationKind::SqsConsume`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqsConsumeSettings {
    /// Queue name, or a full queue URL
    pub queue: String,

    /// Long-poll wait time in seconds
    pub wait_time_seconds: i32,

    /// Visibility timeout in seconds
    pub visibility_timeout: i32,

    /// Variable that receives the message body
    pub body_variable: String,

    /// Variable that receives the serialized attributes
    pub attributes_variable: String,
}

impl SqsConsumeSettings {
    /// Parse from defaulted parameters.
    pub fn from_params(params: &RuntimeParameters) -> Result<Self, ConfigError> {
        Ok(Self {
            queue: params.require(params::SQS_QUEUE_NAME)?.to_string(),
            wait_time_seconds: params.parse_int(
                params::SQS_WAIT_TIME_SECONDS,
                0,
                MAX_WAIT_TIME_SECONDS,
            )? as i32,
            visibility_timeout: params.parse_int(
                params::SQS_VISIBILITY_TIMEOUT,
                0,
                MAX_VISIBILITY_TIMEOUT,
            )? as i32,
            body_variable: params
                .require(params::SQS_RECEIVED_MESSAGE_BODY_REF_NAME)?
                .to_string(),
            attributes_variable: params
                .require(params::SQS_RECEIVED_MESSAGE_ATTRIBUTES_REF_NAME)?
                .to_string(),
        })
    }
}

/// Settings for [`OperationKind::SqsProduce`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqsProduceSettings {
    /// Queue name, or a full queue URL
    pub queue: String,

    /// Message body
    pub body: String,

    /// String message attributes
    pub attributes: BTreeMap<String, String>,

    /// FIFO message group id
    pub group_id: Option<String>,

    /// FIFO deduplication id
    pub deduplication_id: Option<String>,

    /// Delivery delay in seconds
    pub delay_seconds: i32,
}

impl SqsProduceSettings {
    /// Parse from defaulted parameters.
    pub fn from_params(params: &RuntimeParameters) -> Result<Self, ConfigError> {
        let attributes = match params.optional(params::SQS_MESSAGE_ATTRIBUTES) {
            Some(raw) => parse_attribute_object(raw)?,
            None => BTreeMap::new(),
        };

        Ok(Self {
            queue: params.require(params::SQS_QUEUE_NAME)?.to_string(),
            body: params.require(params::SQS_MESSAGE_BODY)?.to_string(),
            attributes,
            group_id: params
                .optional(params::SQS_MESSAGE_GROUP_ID)
                .map(str::to_string),
            deduplication_id: params
                .optional(params::SQS_MESSAGE_DEDUPLICATION_ID)
                .map(str::to_string),
            delay_seconds: params.parse_int(params::SQS_DELAY_SECONDS, 0, MAX_DELAY_SECONDS)?
                as i32,
        })
    }
}

/// Parse a flat JSON object of attribute name to value.
///
/// Numbers and booleans are accepted and kept in their JSON text form.
fn parse_attribute_object(raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: params::SQS_MESSAGE_ATTRIBUTES.to_string(),
        reason,
    };

    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| invalid("expected a JSON object".to_string()))?;

    object
        .iter()
        .map(|(name, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(invalid(format!(
                        "attribute '{}' must be a string, number or boolean",
                        name
                    )))
                }
            };
            Ok((name.clone(), text))
        })
        .collect()
}

/// Settings for [`OperationKind::S3Upload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3UploadSettings {
    pub bucket: String,
    pub key: String,
    /// Local file to upload, checked on every iteration
    pub path: PathBuf,
}

impl S3UploadSettings {
    /// Parse from defaulted parameters.
    pub fn from_params(params: &RuntimeParameters) -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: params.require(params::S3_BUCKET_NAME)?.to_string(),
            key: params.require(params::S3_OBJECT_KEY)?.to_string(),
            path: PathBuf::from(params.require(params::UPLOAD_PATH)?),
        })
    }
}

/// Settings for [`OperationKind::S3Download`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3DownloadSettings {
    pub bucket: String,
    pub key: String,

    /// Destination file; `None` selects the buffered mode
    pub path: Option<PathBuf>,

    /// Transfer buffer size for the streaming mode
    pub buffer_size: usize,
}

impl S3DownloadSettings {
    /// Parse from defaulted parameters.
    pub fn from_params(params: &RuntimeParameters) -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: params.require(params::S3_BUCKET_NAME)?.to_string(),
            key: params.require(params::S3_OBJECT_KEY)?.to_string(),
            path: params.optional(params::DOWNLOAD_PATH).map(PathBuf::from),
            buffer_size: params.parse_int(params::BUFFER_SIZE, 1, MAX_BUFFER_SIZE)? as usize,
        })
    }
}

/// Typed settings of one operation, produced once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum OperationSettings {
    SqsConsume(SqsConsumeSettings),
    SqsProduce(SqsProduceSettings),
    S3Upload(S3UploadSettings),
    S3Download(S3DownloadSettings),
}

impl OperationSettings {
    /// Merge schema defaults into `params` and parse the operation's fields.
    ///
    /// Fails on the first missing or invalid field. Unknown keys are ignored.
    pub fn from_params(kind: OperationKind, params: &RuntimeParameters) -> Result<Self, ConfigError> {
        let params = params.with_defaults(&kind.schema());
        Ok(match kind {
            OperationKind::SqsConsume => Self::SqsConsume(SqsConsumeSettings::from_params(&params)?),
            OperationKind::SqsProduce => Self::SqsProduce(SqsProduceSettings::from_params(&params)?),
            OperationKind::S3Upload => Self::S3Upload(S3UploadSettings::from_params(&params)?),
            OperationKind::S3Download => Self::S3Download(S3DownloadSettings::from_params(&params)?),
        })
    }

    /// The kind these settings belong to.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::SqsConsume(_) => OperationKind::SqsConsume,
            Self::SqsProduce(_) => OperationKind::SqsProduce,
            Self::S3Upload(_) => OperationKind::S3Upload,
            Self::S3Download(_) => OperationKind::S3Download,
        }
    }

    /// Sample label describing the target of the operation.
    pub fn label(&self) -> String {
        match self {
            Self::SqsConsume(s) => format!(
                "Queue Name: {}\nMsg Body refName : {}\nMsg Attribute refName : {}",
                s.queue, s.body_variable, s.attributes_variable
            ),
            Self::SqsProduce(s) => format!("Queue Name: {}", s.queue),
            Self::S3Upload(s) => format!(
                "Bucket Name: {}\nObject Key: {}\nUpload Path: {}",
                s.bucket,
                s.key,
                s.path.display()
            ),
            Self::S3Download(s) => format!(
                "Bucket Name: {}\nObject Key: {}\nDownload Path: {}",
                s.bucket,
                s.key,
                s.path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.to_string().parse::<OperationKind>(), Ok(kind));
        }
        assert_eq!("S3-Upload".parse::<OperationKind>(), Ok(OperationKind::S3Upload));
        assert!(matches!(
            "kafka-produce".parse::<OperationKind>(),
            Err(ConfigError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_consume_settings_use_defaults() {
        let params = RuntimeParameters::new().with(SQS_QUEUE_NAME, "orders");
        let settings = OperationSettings::from_params(OperationKind::SqsConsume, &params).unwrap();

        let OperationSettings::SqsConsume(s) = &settings else {
            panic!("wrong settings variant");
        };
        assert_eq!(s.queue, "orders");
        assert_eq!(s.wait_time_seconds, 10);
        assert_eq!(s.visibility_timeout, 30);
        assert_eq!(s.body_variable, "received_message_body");
        assert_eq!(s.attributes_variable, "received_message_attribute");
        assert_eq!(
            settings.label(),
            "Queue Name: orders\nMsg Body refName : received_message_body\nMsg Attribute refName : received_message_attribute"
        );
    }

    #[test]
    fn test_consume_settings_reject_bad_integers() {
        let params = RuntimeParameters::new()
            .with(SQS_QUEUE_NAME, "orders")
            .with(SQS_WAIT_TIME_SECONDS, "ten");
        assert!(matches!(
            OperationSettings::from_params(OperationKind::SqsConsume, &params),
            Err(ConfigError::InvalidInteger { .. })
        ));

        let params = RuntimeParameters::new()
            .with(SQS_QUEUE_NAME, "orders")
            .with(SQS_WAIT_TIME_SECONDS, "21");
        assert!(matches!(
            OperationSettings::from_params(OperationKind::SqsConsume, &params),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_missing_queue_is_config_error() {
        let err = OperationSettings::from_params(OperationKind::SqsConsume, &RuntimeParameters::new())
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(SQS_QUEUE_NAME.to_string()));
    }

    #[test]
    fn test_produce_settings_parse_attributes() {
        let params = RuntimeParameters::new()
            .with(SQS_QUEUE_NAME, "orders.fifo")
            .with(SQS_MESSAGE_BODY, "hello")
            .with(SQS_MESSAGE_ATTRIBUTES, r#"{"source":"loadgen","priority":3}"#)
            .with(SQS_MESSAGE_GROUP_ID, "g1");

        let OperationSettings::SqsProduce(s) =
            OperationSettings::from_params(OperationKind::SqsProduce, &params).unwrap()
        else {
            panic!("wrong settings variant");
        };
        assert_eq!(s.attributes.get("source").map(String::as_str), Some("loadgen"));
        assert_eq!(s.attributes.get("priority").map(String::as_str), Some("3"));
        assert_eq!(s.group_id.as_deref(), Some("g1"));
        assert!(s.deduplication_id.is_none());
        assert_eq!(s.delay_seconds, 0);
    }

    #[test]
    fn test_produce_settings_reject_nested_attributes() {
        let params = RuntimeParameters::new()
            .with(SQS_QUEUE_NAME, "orders")
            .with(SQS_MESSAGE_BODY, "hello")
            .with(SQS_MESSAGE_ATTRIBUTES, r#"{"nested":{"a":1}}"#);
        assert!(matches!(
            OperationSettings::from_params(OperationKind::SqsProduce, &params),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_download_settings_modes() {
        let base = RuntimeParameters::new()
            .with(S3_BUCKET_NAME, "b")
            .with(S3_OBJECT_KEY, "k");

        let OperationSettings::S3Download(buffered) =
            OperationSettings::from_params(OperationKind::S3Download, &base).unwrap()
        else {
            panic!("wrong settings variant");
        };
        assert!(buffered.path.is_none());
        assert_eq!(buffered.buffer_size, DEFAULT_BUFFER_SIZE);

        let streamed = base.clone().with(DOWNLOAD_PATH, "/tmp/out").with(BUFFER_SIZE, "4096");
        let settings = OperationSettings::from_params(OperationKind::S3Download, &streamed).unwrap();
        assert_eq!(
            settings.label(),
            "Bucket Name: b\nObject Key: k\nDownload Path: /tmp/out"
        );
        let OperationSettings::S3Download(s) = settings else {
            panic!("wrong settings variant");
        };
        assert_eq!(s.buffer_size, 4096);

        let zero = base.with(BUFFER_SIZE, "0");
        assert!(OperationSettings::from_params(OperationKind::S3Download, &zero).is_err());
    }

    #[test]
    fn test_upload_label() {
        let params = RuntimeParameters::new()
            .with(S3_BUCKET_NAME, "b")
            .with(S3_OBJECT_KEY, "k")
            .with(UPLOAD_PATH, "/missing/file");
        let settings = OperationSettings::from_params(OperationKind::S3Upload, &params).unwrap();
        assert_eq!(settings.kind(), OperationKind::S3Upload);
        assert_eq!(
            settings.label(),
            "Bucket Name: b\nObject Key: k\nUpload Path: /missing/file"
        );
    }
}
