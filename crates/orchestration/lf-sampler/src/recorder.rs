//! Sample result recording.
//!
//! [`SampleRecorder::start`] opens a sample; [`succeed`](SampleRecorder::succeed)
//! and [`fail`](SampleRecorder::fail) consume it, so every iteration ends in
//! exactly one terminal call.

use chrono::{DateTime, Utc};
use lf_error::LfError;
use lf_types::{OperationKind, SampleOutcome};
use std::time::Instant;

/// What a successful operation reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub message: String,
    pub data: Option<String>,
    pub bytes: u64,
}

impl Completion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Attach response data.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the payload byte count.
    pub fn with_bytes(mut self, bytes: u64) -> Self {
        self.bytes = bytes;
        self
    }
}

/// An open sample.
#[derive(Debug)]
pub struct SampleRecorder {
    operation: OperationKind,
    label: String,
    started_at: DateTime<Utc>,
    start: Instant,
}

impl SampleRecorder {
    /// Start timing a sample.
    pub fn start(operation: OperationKind, label: impl Into<String>) -> Self {
        Self {
            operation,
            label: label.into(),
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }

    /// Close the sample as a success.
    pub fn succeed(self, completion: Completion) -> SampleOutcome {
        SampleOutcome {
            operation: self.operation,
            label: self.label,
            started_at: self.started_at,
            elapsed: self.start.elapsed(),
            success: true,
            response_message: completion.message,
            response_data: completion.data,
            response_code: None,
            error_detail: None,
            bytes: completion.bytes,
        }
    }

    /// Close the sample as a failure.
    pub fn fail(
        self,
        code: impl Into<String>,
        message: impl Into<String>,
        detail: Option<String>,
    ) -> SampleOutcome {
        SampleOutcome {
            operation: self.operation,
            label: self.label,
            started_at: self.started_at,
            elapsed: self.start.elapsed(),
            success: false,
            response_message: message.into(),
            response_data: None,
            response_code: Some(code.into()),
            error_detail: detail,
            bytes: 0,
        }
    }

    /// Close the sample with the outcome of an operation.
    pub fn finish(self, result: lf_error::Result<Completion>) -> SampleOutcome {
        match result {
            Ok(completion) => self.succeed(completion),
            Err(e) => self.fail_with(&e),
        }
    }

    /// Close the sample as a failure described by `error`.
    pub fn fail_with(self, error: &LfError) -> SampleOutcome {
        self.fail(
            error.response_code(),
            error.response_message(),
            Some(format!("{:?}", error)),
        )
    }
}
