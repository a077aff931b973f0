//! Stats sink implementation.

use async_trait::async_trait;
use lf_error::Result;
use lf_traits::OutcomeSink;
use lf_types::SampleOutcome;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sink that counts outcomes without printing them.
///
/// Used for pure throughput runs.
#[derive(Debug, Default)]
pub struct StatsSink {
    successes: AtomicU64,
    failures: AtomicU64,
    bytes: AtomicU64,
}

impl StatsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current counts.
    pub fn report(&self) -> SinkReport {
        SinkReport {
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
        }
    }
}

/// Counts collected by [`StatsSink`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkReport {
    pub successes: u64,
    pub failures: u64,
    pub bytes: u64,
}

#[async_trait]
impl OutcomeSink for StatsSink {
    async fn record(&self, outcome: &SampleOutcome) -> Result<()> {
        if outcome.success {
            self.successes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        self.bytes.fetch_add(outcome.bytes, Ordering::Relaxed);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
