//! Exponential backoff schedule.

use std::time::Duration;

/// Doubling delay schedule.
///
/// The delay after failed attempt `i` (zero-based) is `initial_delay * 2^i`,
/// optionally capped at `max_delay`. There is no jitter, so the schedule is
/// fully deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    /// Delay after the first failed attempt.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Option<Duration>,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: None,
        }
    }
}

impl ExponentialBackoff {
    /// Create a backoff with the given initial delay and no cap.
    #[must_use]
    pub fn new(initial_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay: None,
        }
    }

    /// Cap every delay at `max`.
    #[must_use]
    pub fn with_max_delay(mut self, max: Duration) -> Self {
        self.max_delay = Some(max);
        self
    }

    /// Delay to sleep after failed attempt `attempt` (zero-based).
    ///
    /// Saturates at [`Duration::MAX`] instead of overflowing.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }

        let delay = 2u32
            .checked_pow(attempt)
            .and_then(|factor| self.initial_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX);

        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    /// The first `count` delays of the schedule.
    pub fn delays(&self, count: u32) -> impl Iterator<Item = Duration> + '_ {
        (0..count).map(move |attempt| self.delay_for(attempt))
    }

    /// Sum of the first `count` delays, i.e. the worst-case time spent
    /// sleeping for a call allowed `count` retries.
    #[must_use]
    pub fn total_for(&self, count: u32) -> Duration {
        self.delays(count)
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(d))
    }
}
