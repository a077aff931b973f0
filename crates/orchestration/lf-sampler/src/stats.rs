//! Statistics for load runs.

use chrono::{DateTime, Duration, Utc};
use lf_error::ErrorKind;
use lf_types::SampleOutcome;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

const CACHE_LINE_SIZE: usize = 64;

/// A cache-line-padded atomic counter.
///
/// Virtual users on different cores update these concurrently; one counter
/// per cache line keeps them from contending on the same line.
#[repr(C, align(64))]
#[derive(Debug)]
struct PaddedAtomicU64 {
    value: AtomicU64,
    _padding: [u8; CACHE_LINE_SIZE - std::mem::size_of::<AtomicU64>()],
}

impl Default for PaddedAtomicU64 {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PaddedAtomicU64 {
    fn new(val: u64) -> Self {
        Self {
            value: AtomicU64::new(val),
            _padding: [0; CACHE_LINE_SIZE - std::mem::size_of::<AtomicU64>()],
        }
    }

    #[inline]
    fn load(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    fn add(&self, val: u64) {
        self.value.fetch_add(val, Ordering::Relaxed);
    }

    #[inline]
    fn min(&self, val: u64) {
        self.value.fetch_min(val, Ordering::Relaxed);
    }

    #[inline]
    fn max(&self, val: u64) {
        self.value.fetch_max(val, Ordering::Relaxed);
    }
}

/// Aggregate statistics shared by all virtual users of a run.
#[derive(Debug)]
pub struct RunStats {
    started_at: DateTime<Utc>,

    iterations: PaddedAtomicU64,
    successes: PaddedAtomicU64,

    config_failures: PaddedAtomicU64,
    remote_failures: PaddedAtomicU64,
    transport_failures: PaddedAtomicU64,
    internal_failures: PaddedAtomicU64,

    /// Users whose session could not be set up
    setup_failures: PaddedAtomicU64,

    bytes: PaddedAtomicU64,

    latency_sum_us: PaddedAtomicU64,
    latency_min_us: PaddedAtomicU64,
    latency_max_us: PaddedAtomicU64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            iterations: PaddedAtomicU64::default(),
            successes: PaddedAtomicU64::default(),
            config_failures: PaddedAtomicU64::default(),
            remote_failures: PaddedAtomicU64::default(),
            transport_failures: PaddedAtomicU64::default(),
            internal_failures: PaddedAtomicU64::default(),
            setup_failures: PaddedAtomicU64::default(),
            bytes: PaddedAtomicU64::default(),
            latency_sum_us: PaddedAtomicU64::default(),
            latency_min_us: PaddedAtomicU64::new(u64::MAX),
            latency_max_us: PaddedAtomicU64::default(),
        }
    }

    /// Record one iteration.
    pub fn record(&self, outcome: &SampleOutcome) {
        self.iterations.add(1);

        let latency = outcome.elapsed.as_micros() as u64;
        self.latency_sum_us.add(latency);
        self.latency_min_us.min(latency);
        self.latency_max_us.max(latency);

        if outcome.success {
            self.successes.add(1);
            self.bytes.add(outcome.bytes);
            return;
        }

        let kind = outcome
            .response_code
            .as_deref()
            .map(ErrorKind::from_response_code)
            .unwrap_or(ErrorKind::Internal);
        match kind {
            ErrorKind::Configuration => self.config_failures.add(1),
            ErrorKind::RemoteService => self.remote_failures.add(1),
            ErrorKind::Transport => self.transport_failures.add(1),
            ErrorKind::Internal => self.internal_failures.add(1),
        }
    }

    /// Record a user that never got a session.
    pub fn record_setup_failure(&self) {
        self.setup_failures.add(1);
    }

    pub fn iterations(&self) -> u64 {
        self.iterations.load()
    }

    pub fn successes(&self) -> u64 {
        self.successes.load()
    }

    /// Failed iterations of every kind.
    pub fn failures(&self) -> u64 {
        self.config_failures.load()
            + self.remote_failures.load()
            + self.transport_failures.load()
            + self.internal_failures.load()
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load()
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        Utc::now() - self.started_at
    }

    /// Create a snapshot of the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        let iterations = self.iterations();
        let min = self.latency_min_us.load();

        StatsSnapshot {
            started_at: self.started_at,
            completed_at: None,
            iterations,
            successes: self.successes(),
            config_failures: self.config_failures.load(),
            remote_failures: self.remote_failures.load(),
            transport_failures: self.transport_failures.load(),
            internal_failures: self.internal_failures.load(),
            setup_failures: self.setup_failures.load(),
            bytes: self.bytes(),
            latency_sum_us: self.latency_sum_us.load(),
            latency_min_us: if iterations == 0 { 0 } else { min },
            latency_max_us: self.latency_max_us.load(),
        }
    }
}

/// A serializable snapshot of run statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub iterations: u64,
    pub successes: u64,
    pub config_failures: u64,
    pub remote_failures: u64,
    pub transport_failures: u64,
    pub internal_failures: u64,
    pub setup_failures: u64,
    pub bytes: u64,
    pub latency_sum_us: u64,
    pub latency_min_us: u64,
    pub latency_max_us: u64,
}

impl StatsSnapshot {
    pub fn failures(&self) -> u64 {
        self.config_failures + self.remote_failures + self.transport_failures + self.internal_failures
    }

    /// Mean iteration latency in milliseconds.
    pub fn mean_latency_ms(&self) -> Option<f64> {
        (self.iterations > 0)
            .then(|| self.latency_sum_us as f64 / self.iterations as f64 / 1000.0)
    }

    /// Wall-clock duration of the run, once completed.
    pub fn duration(&self) -> Option<Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }

    /// Iterations per second over the whole run.
    pub fn iterations_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.iterations as f64 / secs
            } else {
                0.0
            }
        })
    }
}

/// Per-user counters, owned by the user's task and returned when it ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub worker_id: usize,
    pub iterations: u64,
    pub successes: u64,
    pub failures: u64,
    pub bytes: u64,
    /// Set when the session could not be set up
    pub setup_error: Option<String>,
}

impl UserStats {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &SampleOutcome) {
        self.iterations += 1;
        if outcome.success {
            self.successes += 1;
            self.bytes += outcome.bytes;
        } else {
            self.failures += 1;
        }
    }
}
