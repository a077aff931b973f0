//! Load run orchestration.

use crate::config::RunConfig;
use crate::session::WorkerSession;
use crate::stats::{RunStats, StatsSnapshot, UserStats};
use lf_error::{ConfigError, Result};
use lf_traits::{ClientFactory, OutcomeSink};
use lf_types::{AwsSettings, OperationKind, OperationSettings, RuntimeParameters, Variables};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Result of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub operation: OperationKind,
    pub stats: StatsSnapshot,
    pub users: Vec<UserStats>,
}

/// Runs one operation with a number of concurrent virtual users.
///
/// Every user runs setup, its iterations and teardown on its own task with a
/// private session and variable namespace. Outcomes go to the sink and into
/// the shared [`RunStats`].
pub struct LoadRunner {
    config: RunConfig,
    kind: OperationKind,
    params: Arc<RuntimeParameters>,
    factory: Arc<dyn ClientFactory>,
    sink: Arc<dyn OutcomeSink>,
    stats: Arc<RunStats>,
}

impl LoadRunner {
    pub fn new(
        config: RunConfig,
        kind: OperationKind,
        params: RuntimeParameters,
        factory: Arc<dyn ClientFactory>,
        sink: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self {
            config,
            kind,
            params: Arc::new(params),
            factory,
            sink,
            stats: Arc::new(RunStats::new()),
        }
    }

    /// Live statistics, for progress reporting.
    pub fn stats(&self) -> &Arc<RunStats> {
        &self.stats
    }

    /// Run all virtual users to completion.
    ///
    /// The run configuration and the operation parameters are checked before
    /// any user starts; a configuration error aborts the run.
    pub async fn run(&self) -> Result<RunReport> {
        self.config
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                name: "run".to_string(),
                reason,
            })?;
        OperationSettings::from_params(self.kind, &self.params)?;
        AwsSettings::from_params(&self.params)?;

        info!(
            operation = %self.kind,
            users = self.config.virtual_users,
            iterations = ?self.config.iterations,
            duration_secs = ?self.config.duration.map(|d| d.as_secs()),
            "Starting load run"
        );

        let deadline = self.config.duration.map(|d| Instant::now() + d);

        let completed = Arc::new(Mutex::new(Vec::with_capacity(self.config.virtual_users)));

        let handles: Vec<JoinHandle<()>> = (0..self.config.virtual_users)
            .map(|worker_id| {
                let user = VirtualUser {
                    worker_id,
                    kind: self.kind,
                    params: Arc::clone(&self.params),
                    factory: Arc::clone(&self.factory),
                    sink: Arc::clone(&self.sink),
                    stats: Arc::clone(&self.stats),
                    completed: Arc::clone(&completed),
                    iterations: self.config.iterations,
                    deadline,
                    think_time: self.config.think_time,
                };
                tokio::spawn(user.run())
            })
            .collect();
        let abort_handles: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();

        let joined = futures::future::join_all(handles);
        let results = match deadline {
            Some(deadline) => {
                match tokio::time::timeout_at(deadline + self.config.shutdown_timeout, joined).await {
                    Ok(results) => results,
                    Err(_) => {
                        let pending = abort_handles.iter().filter(|h| !h.is_finished()).count();
                        warn!(pending, "Shutdown timeout exceeded, aborting remaining users");
                        for handle in &abort_handles {
                            handle.abort();
                        }
                        Vec::new()
                    }
                }
            }
            None => joined.await,
        };

        for (i, result) in results.into_iter().enumerate() {
            if let Err(e) = result {
                error!(worker = i, error = %e, "Virtual user panicked");
            }
        }

        // users that finished before any abort, in worker order
        let mut users = std::mem::take(&mut *completed.lock());
        users.sort_by_key(|u| u.worker_id);

        if let Err(e) = self.sink.flush().await {
            warn!(error = %e, "Failed to flush outcome sink");
        }

        let mut stats = self.stats.snapshot();
        stats.completed_at = Some(chrono::Utc::now());

        info!(
            iterations = stats.iterations,
            successes = stats.successes,
            failures = stats.failures(),
            bytes = stats.bytes,
            "Load run completed"
        );

        Ok(RunReport {
            operation: self.kind,
            stats,
            users,
        })
    }
}

struct VirtualUser {
    worker_id: usize,
    kind: OperationKind,
    params: Arc<RuntimeParameters>,
    factory: Arc<dyn ClientFactory>,
    sink: Arc<dyn OutcomeSink>,
    stats: Arc<RunStats>,
    completed: Arc<Mutex<Vec<UserStats>>>,
    iterations: Option<u64>,
    deadline: Option<Instant>,
    think_time: std::time::Duration,
}

impl VirtualUser {
    async fn run(self) {
        let user_stats = self.drive().await;
        self.completed.lock().push(user_stats);
    }

    async fn drive(&self) -> UserStats {
        let mut user_stats = UserStats::new(self.worker_id);

        let mut session = match WorkerSession::setup(
            self.worker_id,
            self.kind,
            &self.params,
            self.factory.as_ref(),
        )
        .await
        {
            Ok(session) => session,
            Err(e) => {
                error!(worker = self.worker_id, error = %e, "Session setup failed");
                self.stats.record_setup_failure();
                user_stats.setup_error = Some(e.to_string());
                return user_stats;
            }
        };

        debug!(worker = self.worker_id, "Virtual user started");
        let mut vars = Variables::new();
        let mut done = 0u64;

        while !self.finished(done) {
            let outcome = session.execute(&mut vars).await;
            done += 1;

            self.stats.record(&outcome);
            user_stats.record(&outcome);
            if !outcome.success {
                warn!(
                    worker = self.worker_id,
                    code = outcome.response_code.as_deref().unwrap_or_default(),
                    message = %outcome.response_message,
                    "Iteration failed"
                );
            }
            if let Err(e) = self.sink.record(&outcome).await {
                warn!(worker = self.worker_id, error = %e, "Failed to record outcome");
            }

            if !self.think_time.is_zero() && !self.finished(done) {
                tokio::time::sleep(self.think_time).await;
            }
        }

        session.teardown();
        debug!(worker = self.worker_id, iterations = done, "Virtual user stopped");
        user_stats
    }

    fn finished(&self, done: u64) -> bool {
        self.iterations.is_some_and(|max| done >= max)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
