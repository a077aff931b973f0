//! Configuration of a load run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shape of a load run: how many virtual users and how long each runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of concurrent virtual users
    pub virtual_users: usize,

    /// Iterations per virtual user; `None` runs until the duration elapses
    pub iterations: Option<u64>,

    /// Wall-clock limit for the whole run
    #[serde(default, with = "optional_secs")]
    pub duration: Option<Duration>,

    /// Pause between iterations of one user
    #[serde(with = "millis")]
    pub think_time: Duration,

    /// How long to wait for users to finish their current iteration at the end
    #[serde(with = "secs")]
    pub shutdown_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            virtual_users: 1,
            iterations: Some(1),
            duration: None,
            think_time: Duration::ZERO,
            shutdown_timeout: Duration::from_secs(60),
        }
    }
}

impl RunConfig {
    /// Create a run configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of virtual users.
    pub fn with_virtual_users(mut self, users: usize) -> Self {
        self.virtual_users = users;
        self
    }

    /// Set the iterations per user.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Remove the per-user iteration limit.
    pub fn with_unbounded_iterations(mut self) -> Self {
        self.iterations = None;
        self
    }

    /// Set the run duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the think time between iterations.
    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// Set the shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.virtual_users == 0 {
            return Err("virtual_users must be at least 1".to_string());
        }
        if self.iterations == Some(0) {
            return Err("iterations must be at least 1".to_string());
        }
        if self.duration == Some(Duration::ZERO) {
            return Err("duration must be greater than zero".to_string());
        }
        if self.iterations.is_none() && self.duration.is_none() {
            return Err("either iterations or duration must be set".to_string());
        }
        Ok(())
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

mod optional_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
