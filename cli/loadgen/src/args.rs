//! CLI argument definitions for lf-loadgen.

use clap::{Parser, ValueEnum};
pub use lf_cli_common::LogLevel;
use lf_types::OperationKind;
use std::path::PathBuf;

/// Load generator for AWS message queue and object storage operations.
///
/// Runs one operation with a number of concurrent virtual users and reports
/// the latency and result of every iteration.
///
/// ## Examples
///
/// Consume from a queue with 4 users, 100 iterations each:
///   lf-loadgen sqs-consume -u 4 -n 100 -p sqs_queue_name=orders
///
/// Upload a file against LocalStack for 30 seconds:
///   lf-loadgen s3-upload --endpoint-url http://localhost:4566 --duration 30 \
///     -p s3_bucket_name=bench -p s3_object_key=blob -p upload_path=./blob.bin
///
/// Show the parameters of an operation:
///   lf-loadgen s3-download --describe
#[derive(Parser, Debug)]
#[command(name = "lf-loadgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Operation to run
    #[arg(value_enum)]
    pub operation: OperationArg,

    /// Print the operation's parameters and defaults, then exit
    #[arg(long)]
    pub describe: bool,

    // === Operation parameters ===
    /// Operation parameter as name=value (repeatable)
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// JSON file with a flat object of parameters; -p values take precedence
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    // === AWS identity ===
    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS profile name, used when no static key pair is given
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS session token for temporary credentials
    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    /// Endpoint override (private endpoint, LocalStack)
    #[arg(long, env = "LF_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    // === Run shape ===
    /// Number of concurrent virtual users (must be >= 1)
    #[arg(short = 'u', long, default_value = "1", value_parser = parse_positive_usize)]
    pub users: usize,

    /// Iterations per user (default 1 unless --duration is given)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub iterations: Option<u64>,

    /// Run duration in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub duration: Option<u64>,

    /// Pause between iterations of one user, in milliseconds
    #[arg(long, default_value = "0")]
    pub think_time_ms: u64,

    /// Seconds to wait for in-flight iterations after the duration elapsed
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pub shutdown_timeout: u64,

    // === Output ===
    /// Where sample outcomes go
    #[arg(short = 's', long, value_enum, default_value = "stdout")]
    pub sink: SinkArg,

    /// Output format for the stdout sink
    #[arg(long, value_enum, default_value = "jsonl")]
    pub output_format: OutputFormatArg,

    // === Progress Options ===
    /// Enable progress reporting to stderr
    #[arg(long)]
    pub progress: bool,

    /// Progress reporting interval in seconds
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub progress_interval: u64,

    // === Logging ===
    /// Log level
    #[arg(short = 'l', long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Operation argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    /// Receive, publish and delete one message per iteration
    SqsConsume,
    /// Send one message per iteration
    SqsProduce,
    /// Upload a local file per iteration
    S3Upload,
    /// Download an object per iteration
    S3Download,
}

impl From<OperationArg> for OperationKind {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::SqsConsume => OperationKind::SqsConsume,
            OperationArg::SqsProduce => OperationKind::SqsProduce,
            OperationArg::S3Upload => OperationKind::S3Upload,
            OperationArg::S3Download => OperationKind::S3Download,
        }
    }
}

/// Sink argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkArg {
    /// Print every outcome
    Stdout,
    /// Count outcomes only (for throughput runs)
    Stats,
}

impl From<SinkArg> for lf_sampler::SinkType {
    fn from(arg: SinkArg) -> Self {
        match arg {
            SinkArg::Stdout => lf_sampler::SinkType::Stdout,
            SinkArg::Stats => lf_sampler::SinkType::Stats,
        }
    }
}

/// Output format for the stdout sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// JSON Lines (one JSON object per line)
    Jsonl,
    /// Pretty-printed JSON
    Json,
}

impl From<OutputFormatArg> for lf_sampler::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Jsonl => lf_sampler::OutputFormat::Jsonl,
            OutputFormatArg::Json => lf_sampler::OutputFormat::Json,
        }
    }
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}

/// Parse `name=value`. The value may itself contain `=`.
fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("'{}' is not in name=value form", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("'{}' has an empty parameter name", s));
    }
    Ok((name.to_string(), value.to_string()))
}
