use std::time::Duration;

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds. `None` leaves the network
    /// default in place.
    pub timeout_ms: Option<u64>,
    /// Maximum number of transport calls per logical request, including
    /// the first one.
    pub max_attempts: u32,
    /// Backoff unit in milliseconds. The delay before retry `k` is
    /// `k * retry_backoff_ms` (linear, no jitter).
    pub retry_backoff_ms: u64,
}

impl ClientOptions {
    /// Delay to wait after `retries` unsuccessful attempts.
    pub fn backoff_for(&self, retries: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(retries)))
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_attempts: 3,
            retry_backoff_ms: 1_000,
        }
    }
}
