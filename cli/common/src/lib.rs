//! Shared utilities for loadflow CLI binaries.
//!
//! Logging setup, the log level argument and human-readable formatting used
//! by `lf-loadgen` for progress lines and run summaries.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_bytes, format_latency_ms, format_number};
pub use logging::init_logging;
