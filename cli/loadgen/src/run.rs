//! Main execution logic for lf-loadgen CLI.

use anyhow::{anyhow, Context, Result};
use lf_sampler::{create_sink, AwsClientFactory, LoadRunner, RunConfig, RunReport};
use lf_types::{params, OperationKind, OperationSchema, RuntimeParameters};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::args::Cli;
use crate::progress::ProgressReporter;

/// Execute a load run with the provided arguments.
pub async fn execute(args: Cli) -> Result<RunReport> {
    let kind: OperationKind = args.operation.into();
    let params = build_parameters(&args)?;
    let config = build_run_config(&args);

    info!(operation = %kind, parameters = params.len(), "Preparing load run");

    let sink = create_sink(args.sink.into(), args.output_format.into());
    let runner = LoadRunner::new(
        config,
        kind,
        params,
        Arc::new(AwsClientFactory::new()),
        sink,
    );

    let mut progress = ProgressReporter::new(args.progress, args.progress_interval);
    progress.start(Arc::clone(runner.stats()));

    let result = runner.run().await;
    progress.stop(runner.stats()).await;

    Ok(result?)
}

/// Merge the parameter sources.
///
/// Lowest to highest precedence: the params file, identity flags and their
/// environment variables, then `-p` values.
pub fn build_parameters(args: &Cli) -> Result<RuntimeParameters> {
    let mut merged = match &args.params_file {
        Some(path) => read_params_file(path)?,
        None => RuntimeParameters::new(),
    };

    let identity = [
        (params::AWS_REGION, &args.region),
        (params::AWS_CONFIGURATION_PROFILE, &args.profile),
        (params::AWS_ACCESS_KEY_ID, &args.access_key),
        (params::AWS_SECRET_ACCESS_KEY, &args.secret_key),
        (params::AWS_SESSION_TOKEN, &args.session_token),
        (params::AWS_ENDPOINT_URL, &args.endpoint_url),
    ];
    for (name, value) in identity {
        if let Some(value) = value {
            merged.insert(name, value.as_str());
        }
    }

    merged.extend(args.params.iter().cloned());
    Ok(merged)
}

fn read_params_file(path: &Path) -> Result<RuntimeParameters> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read params file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("params file {} is not valid JSON", path.display()))?;
    let object = value
        .as_object()
        .ok_or_else(|| anyhow!("params file {} must hold a JSON object", path.display()))?;

    object
        .iter()
        .map(|(name, value)| match value {
            serde_json::Value::String(s) => Ok((name.clone(), s.clone())),
            serde_json::Value::Number(n) => Ok((name.clone(), n.to_string())),
            serde_json::Value::Bool(b) => Ok((name.clone(), b.to_string())),
            // nested objects (e.g. message attributes) are passed as JSON text
            serde_json::Value::Object(_) => Ok((name.clone(), value.to_string())),
            _ => Err(anyhow!("parameter '{}' must be a string, number, boolean or object", name)),
        })
        .collect()
}

/// Translate run-shape flags into a [`RunConfig`].
pub fn build_run_config(args: &Cli) -> RunConfig {
    let mut config = RunConfig::new()
        .with_virtual_users(args.users)
        .with_think_time(Duration::from_millis(args.think_time_ms))
        .with_shutdown_timeout(Duration::from_secs(args.shutdown_timeout));

    if let Some(secs) = args.duration {
        config = config
            .with_duration(Duration::from_secs(secs))
            .with_unbounded_iterations();
    }
    if let Some(n) = args.iterations {
        config = config.with_iterations(n);
    }
    config
}

/// Render the parameter table of an operation.
pub fn describe(kind: OperationKind) -> String {
    let schema = OperationSchema::for_kind(kind);
    let width = schema
        .params()
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "Parameters for {}:", kind);
    for p in schema.params() {
        let default = if p.default_value.is_empty() {
            String::new()
        } else {
            format!(" [default: {}]", p.default_value)
        };
        let _ = writeln!(out, "  {:width$}  {}{}", p.name, p.description, default, width = width);
    }
    out
}
