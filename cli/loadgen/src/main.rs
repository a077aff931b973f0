//! lf-loadgen CLI
//!
//! Load generator for AWS SQS and S3 operations.

use clap::Parser;
use lf_cli_common::{format_bytes, format_latency_ms, format_number, init_logging};

mod args;
mod progress;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if args.describe {
        print!("{}", run::describe(args.operation.into()));
        return Ok(());
    }

    // stderr only; stdout carries sample outcomes
    init_logging(args.log_level)?;

    let report = run::execute(args).await?;
    let stats = &report.stats;

    eprintln!();
    eprintln!("Run completed ({}):", report.operation);
    eprintln!("  Virtual users:   {}", report.users.len());
    eprintln!("  Iterations:      {}", format_number(stats.iterations));
    eprintln!("  Succeeded:       {}", format_number(stats.successes));
    eprintln!("  Failed:          {}", format_number(stats.failures()));
    if stats.bytes > 0 {
        eprintln!("  Bytes:           {}", format_bytes(stats.bytes));
    }

    if let Some(mean) = stats.mean_latency_ms() {
        eprintln!(
            "  Latency:         mean {}, min {}, max {}",
            format_latency_ms(mean),
            format_latency_ms(stats.latency_min_us as f64 / 1000.0),
            format_latency_ms(stats.latency_max_us as f64 / 1000.0)
        );
    }

    if let Some(duration) = stats.duration() {
        let secs = duration.num_milliseconds() as f64 / 1000.0;
        eprintln!("  Duration:        {:.2}s", secs);
        if let Some(rate) = stats.iterations_per_second().filter(|r| *r > 0.0) {
            eprintln!("  Throughput:      {:.1} iterations/sec", rate);
        }
    }

    if stats.failures() > 0 {
        eprintln!(
            "  Errors:          {} config, {} remote, {} transport, {} internal",
            stats.config_failures,
            stats.remote_failures,
            stats.transport_failures,
            stats.internal_failures
        );
    }
    if stats.setup_failures > 0 {
        eprintln!("  Setup failures:  {}", stats.setup_failures);
    }

    if stats.failures() > 0 || stats.setup_failures > 0 {
        std::process::exit(4); // Partial failure
    }

    Ok(())
}
