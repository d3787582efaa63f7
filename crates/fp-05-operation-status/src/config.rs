//! Poller configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Budget for [`wait_for_completion`](crate::OperationStatusApi::wait_for_completion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Status checks before giving up
    pub max_attempts: u32,

    /// Pause between checks, in milliseconds
    pub interval_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 300,
            interval_ms: 500,
        }
    }
}

impl PollerConfig {
    /// Create configuration from environment variables.
    ///
    /// - `FP_POLL_MAX_ATTEMPTS`: status checks (default: 300)
    /// - `FP_POLL_INTERVAL_MS`: pause between checks (default: 500)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: lookup("FP_POLL_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_attempts),
            interval_ms: lookup("FP_POLL_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.interval_ms),
        }
    }

    /// Status checks to make; a configured zero still checks once.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Pause between checks.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
