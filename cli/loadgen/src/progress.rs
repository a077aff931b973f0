//! Progress reporting for lf-loadgen.

use lf_cli_common::{format_bytes, format_number};
use lf_sampler::RunStats;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Periodic stderr progress lines while a run is in flight.
pub struct ProgressReporter {
    enabled: bool,
    interval: Duration,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    start_time: Instant,
}

impl ProgressReporter {
    pub fn new(enabled: bool, interval_secs: u64) -> Self {
        Self {
            enabled,
            interval: Duration::from_secs(interval_secs),
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
            start_time: Instant::now(),
        }
    }

    /// Start the background reporter task.
    pub fn start(&mut self, stats: Arc<RunStats>) {
        if !self.enabled {
            return;
        }

        let stop = Arc::clone(&self.stop);
        let interval = self.interval;
        let start_time = self.start_time;

        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.tick().await; // first tick is immediate

            loop {
                timer.tick().await;
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let _ = writeln!(io::stderr(), "[Progress] {}", progress_line(&stats, start_time));
            }
        });

        self.handle = Some(handle);
    }

    /// Stop the reporter and print a final line.
    pub async fn stop(mut self, stats: &RunStats) {
        if !self.enabled {
            return;
        }

        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            // the task may be parked on a long tick
            handle.abort();
            let _ = handle.await;
        }

        let _ = writeln!(
            io::stderr(),
            "[Progress] Complete: {}",
            progress_line(stats, self.start_time)
        );
    }
}

fn progress_line(stats: &RunStats, start_time: Instant) -> String {
    format!(
        "{} iterations, {} failed, {} transferred ({:.1}s elapsed)",
        format_number(stats.iterations()),
        format_number(stats.failures()),
        format_bytes(stats.bytes()),
        start_time.elapsed().as_secs_f64()
    )
}
