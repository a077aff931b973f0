//! Outcome sink trait.

use async_trait::async_trait;
use lf_error::Result;
use lf_types::SampleOutcome;

/// Destination for sample outcomes.
///
/// Shared by all virtual users, so implementations must be safe to call
/// concurrently.
///
/// # Implementations
///
/// - Stdout sink: one JSON document per outcome
/// - Stats sink: counts outcomes and discards them
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    /// Records one outcome.
    async fn record(&self, outcome: &SampleOutcome) -> Result<()>;

    /// Flushes any buffered output.
    async fn flush(&self) -> Result<()>;
}
