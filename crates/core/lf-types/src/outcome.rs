//! The record produced by every iteration.

use crate::operation::OperationKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of one iteration. Built by the recorder, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleOutcome {
    /// Operation that produced the sample
    pub operation: OperationKind,

    /// Human-readable description of the target
    pub label: String,

    /// Wall-clock start
    pub started_at: DateTime<Utc>,

    /// Time from start to the terminal call
    #[serde(rename = "elapsed_us", with = "duration_micros")]
    pub elapsed: Duration,

    pub success: bool,

    pub response_message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<String>,

    /// Service error code, or the local error kind code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,

    /// Payload bytes moved by the operation
    #[serde(default)]
    pub bytes: u64,
}

impl SampleOutcome {
    /// Elapsed time in whole milliseconds.
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

mod duration_micros {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_micros() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_micros(u64::deserialize(deserializer)?))
    }
}
