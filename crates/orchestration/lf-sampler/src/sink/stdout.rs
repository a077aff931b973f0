//! Stdout sink implementation.

use async_trait::async_trait;
use lf_error::{LfError, Result};
use lf_traits::OutcomeSink;
use lf_types::SampleOutcome;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Output format for the stdout sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Pretty-printed JSON
    Json,
}

/// Sink that prints each outcome as JSON.
pub struct StdoutSink {
    format: OutputFormat,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl StdoutSink {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writer(format, Box::new(io::stdout()))
    }

    /// Write to something other than stdout.
    pub fn with_writer(format: OutputFormat, writer: Box<dyn Write + Send>) -> Self {
        Self {
            format,
            writer: Mutex::new(writer),
        }
    }

    pub fn jsonl() -> Self {
        Self::new(OutputFormat::Jsonl)
    }

    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    fn render(&self, outcome: &SampleOutcome) -> Result<String> {
        let rendered = match self.format {
            OutputFormat::Jsonl => serde_json::to_string(outcome),
            OutputFormat::Json => serde_json::to_string_pretty(outcome),
        };
        rendered.map_err(|e| LfError::Other(e.into()))
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::jsonl()
    }
}

#[async_trait]
impl OutcomeSink for StdoutSink {
    async fn record(&self, outcome: &SampleOutcome) -> Result<()> {
        let line = self.render(outcome)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line).map_err(|e| LfError::Other(e.into()))
    }

    async fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| LfError::Other(e.into()))
    }
}
