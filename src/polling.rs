//! # Result Polling Policy
//!
//! Schedule for repeated `/get_result` requests: fixed or exponentially growing
//! delays, with optional limits on attempts and total time.

use std::time::Duration;

use crate::config::PollingConfig;

/// How often, and for how long, to poll for a task result
///
/// The default polls every second forever.
///
/// ```rust
/// use std::time::Duration;
/// use taskq_client::PollPolicy;
///
/// let policy = PollPolicy::exponential(Duration::from_millis(100), 2.0, Duration::from_secs(1))
///     .with_max_attempts(10);
/// assert_eq!(policy.delay_for(1), Duration::from_millis(100));
/// assert_eq!(policy.delay_for(3), Duration::from_millis(400));
/// assert_eq!(policy.delay_for(8), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub backoff_multiplier: f64,
    pub max_interval: Duration,
    pub max_attempts: Option<u32>,
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(1))
    }
}

impl PollPolicy {
    /// Poll at a constant interval with no limit
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            backoff_multiplier: 1.0,
            max_interval: interval,
            max_attempts: None,
            max_wait: None,
        }
    }

    /// Poll with a delay that grows by `multiplier` after each attempt, capped at `max_interval`
    pub fn exponential(initial: Duration, multiplier: f64, max_interval: Duration) -> Self {
        Self {
            interval: initial,
            backoff_multiplier: multiplier.max(1.0),
            max_interval: max_interval.max(initial),
            max_attempts: None,
            max_wait: None,
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Delay to sleep after the `attempt`-th request (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(64) as i32;
        if self.backoff_multiplier <= 1.0 || exponent == 0 {
            return self.interval;
        }

        let scaled = self.interval.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_interval.as_secs_f64() {
            self.max_interval
        } else {
            Duration::from_secs_f64(scaled)
        }
    }

    /// Whether no more requests may be made after `attempt` of them
    pub fn attempts_exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        let interval = Duration::from_millis(config.interval_ms);
        let mut policy = PollPolicy::exponential(
            interval,
            config.backoff_multiplier,
            Duration::from_millis(config.max_interval_ms),
        );
        policy.max_attempts = config.max_attempts;
        policy.max_wait = config.max_wait_ms.map(Duration::from_millis);
        policy
    }
}
