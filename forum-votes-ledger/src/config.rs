//! Configuration types for the `VoteLedger`.
use std::time::Duration;

/// Configuration for the `VoteLedger`.
///
/// Bounds how long a single store call may take and how many times a vote is
/// attempted when its conditional update keeps losing to concurrent writers.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Upper bound for every individual store call.
    pub store_timeout: Duration,
    /// Total attempts per vote, including the first one. Values below 1 are treated as 1.
    pub max_attempts: usize,
    /// Base pause between attempts; jittered.
    pub retry_delay: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            max_attempts: 5,
            retry_delay: Duration::from_millis(10),
        }
    }
}

impl LedgerConfig {
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}
