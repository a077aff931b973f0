//! Outcome sinks.

mod stats;
mod stdout;

pub use stats::{SinkReport, StatsSink};
pub use stdout::{OutputFormat, StdoutSink};

use lf_traits::OutcomeSink;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Available sink types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkType {
    /// Write every outcome to stdout
    Stdout,
    /// Count outcomes only
    Stats,
}

/// Create a sink of the given type.
pub fn create_sink(sink_type: SinkType, format: OutputFormat) -> Arc<dyn OutcomeSink> {
    match sink_type {
        SinkType::Stdout => Arc::new(StdoutSink::new(format)),
        SinkType::Stats => Arc::new(StatsSink::new()),
    }
}
