use std::time::Duration;

use serde::Deserialize;

const DEFAULT_TICK_INTERVAL_MS: u64 = 350;
const DEFAULT_REPORT_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Pacing and delivery settings of a session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Time between two simulation ticks while a wave runs.
    pub tick_interval_ms: u64,
    /// How many times an outcome report is attempted before it is deferred.
    pub report_attempts: u32,
    /// Base delay between report attempts; the n-th retry waits n times this.
    pub retry_backoff_ms: u64,
}

impl SessionConfig {
    /// Tick period as a [`Duration`].
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Delay before retry number `retry`, counting from one.
    #[must_use]
    pub fn retry_backoff(&self, retry: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms).saturating_mul(retry)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            report_attempts: DEFAULT_REPORT_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_linearly() {
        let config = SessionConfig::default();
        assert_eq!(config.retry_backoff(1), Duration::from_millis(500));
        assert_eq!(config.retry_backoff(2), Duration::from_secs(1));
        assert_eq!(config.tick_interval(), Duration::from_millis(350));
    }
}
