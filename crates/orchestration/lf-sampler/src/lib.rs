//! lf-sampler - Load sampling engine for loadflow.
//!
//! This crate issues AWS API calls as load-test iterations and records the
//! latency and result of each one. It provides:
//!
//! - AWS-backed queue and object store clients behind the `lf-traits` seams
//! - Worker sessions that own one client from setup to teardown
//! - Executors for message consume/produce and object upload/download
//! - A runner that drives concurrent virtual users and aggregates statistics
//!
//! # Example
//!
//! ```ignore
//! use lf_sampler::{AwsClientFactory, LoadRunner, RunConfig, StatsSink};
//! use lf_types::{OperationKind, RuntimeParameters};
//! use std::sync::Arc;
//!
//! let params = RuntimeParameters::new()
//!     .with("aws_region", "us-east-1")
//!     .with("aws_configuration_profile", "loadtest")
//!     .with("sqs_queue_name", "orders");
//!
//! let runner = LoadRunner::new(
//!     RunConfig::new().with_virtual_users(4).with_iterations(100),
//!     OperationKind::SqsConsume,
//!     params,
//!     Arc::new(AwsClientFactory::new()),
//!     Arc::new(StatsSink::new()),
//! );
//! let report = runner.run().await?;
//!
//! eprintln!("{} iterations, {} failed", report.stats.iterations, report.stats.failures());
//! ```

pub mod client;
pub mod config;
pub mod executor;
pub mod recorder;
pub mod runner;
pub mod session;
pub mod sink;
pub mod stats;

#[cfg(test)]
mod testing;

pub use client::{build_sdk_config, AwsClientFactory, S3ObjectStore, SqsQueueClient};
pub use config::RunConfig;
pub use executor::StreamProgress;
pub use recorder::{Completion, SampleRecorder};
pub use runner::{LoadRunner, RunReport};
pub use session::{ClientHandle, QueueDirectory, WorkerSession};
pub use sink::{create_sink, OutputFormat, SinkReport, SinkType, StatsSink, StdoutSink};
pub use stats::{RunStats, StatsSnapshot, UserStats};
