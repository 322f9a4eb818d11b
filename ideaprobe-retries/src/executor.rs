//! Retry executor for running attempts with backoff.
//!
//! Attempts are strictly sequential. A failure that reports itself as
//! retryable is followed by a backoff sleep and a new attempt until
//! [`RetryConfig::max_retries`] is used up; any other failure ends the loop
//! immediately.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::strategy::Retryable;

/// What happened on one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The attempt produced a result.
    Succeeded,
    /// The attempt failed and another one followed.
    Retried {
        /// Failure description.
        reason: String,
    },
    /// The attempt failed and was the last one.
    Failed {
        /// Failure description.
        reason: String,
    },
}

impl AttemptOutcome {
    /// Whether the attempt produced a result.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Information about a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptInfo {
    /// Zero-based attempt index.
    pub attempt: u32,
    /// How it ended.
    pub outcome: AttemptOutcome,
    /// Time slept after this attempt before the next one.
    pub wait: Duration,
}

/// Call-local record of every attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptState {
    /// Attempts made so far.
    pub attempts: u32,
    /// Total time spent sleeping between attempts.
    pub total_wait: Duration,
    /// History of attempts, in order.
    pub history: Vec<AttemptInfo>,
}

impl AttemptState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays slept so far, in order.
    #[must_use]
    pub fn waits(&self) -> Vec<Duration> {
        self.history
            .iter()
            .map(|info| info.wait)
            .filter(|wait| !wait.is_zero())
            .collect()
    }

    /// The most recent attempt.
    #[must_use]
    pub fn last(&self) -> Option<&AttemptInfo> {
        self.history.last()
    }

    fn record(&mut self, attempt: u32, outcome: AttemptOutcome, wait: Duration) {
        self.attempts = attempt + 1;
        self.total_wait = self.total_wait.saturating_add(wait);
        self.history.push(AttemptInfo {
            attempt,
            outcome,
            wait,
        });
    }
}

enum Next {
    Stop,
    Sleep(Duration),
}

/// Bookkeeping shared by the async and blocking loops.
fn after_failure<E>(config: &RetryConfig, state: &mut AttemptState, attempt: u32, error: &E) -> Next
where
    E: Retryable + Display,
{
    let reason = error.to_string();

    if !error.is_retryable() || attempt >= config.max_retries {
        warn!(
            attempt,
            retryable = error.is_retryable(),
            error = %reason,
            "Retry exhausted or error not retryable"
        );
        state.record(attempt, AttemptOutcome::Failed { reason }, Duration::ZERO);
        return Next::Stop;
    }

    let wait = config.backoff().delay_for(attempt);
    debug!(
        attempt,
        wait_ms = wait.as_millis() as u64,
        error = %reason,
        "Waiting before retry"
    );
    state.record(attempt, AttemptOutcome::Retried { reason }, wait);
    Next::Sleep(wait)
}

/// Execute an async operation with retries and return its attempt history.
///
/// `operation` receives the zero-based attempt index. Sleeping uses
/// [`tokio::time::sleep`], so an outer timeout interrupts a pending backoff.
///
/// # Example
///
/// ```rust
/// use ideaprobe_retries::{with_retry_state, RetryConfig, Retryable};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct Flaky;
///
/// impl std::fmt::Display for Flaky {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("flaky")
///     }
/// }
///
/// impl Retryable for Flaky {
///     fn is_retryable(&self) -> bool {
///         true
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let config = RetryConfig::new().initial_delay(Duration::ZERO);
/// let (result, state) = with_retry_state(&config, |attempt| async move {
///     if attempt < 2 { Err(Flaky) } else { Ok(attempt) }
/// })
/// .await;
///
/// assert_eq!(result.unwrap(), 2);
/// assert_eq!(state.attempts, 3);
/// # });
/// ```
pub async fn with_retry_state<F, Fut, T, E>(
    config: &RetryConfig,
    mut operation: F,
) -> (Result<T, E>, AttemptState)
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let mut state = AttemptState::new();
    let mut attempt = 0;

    loop {
        debug!(
            attempt,
            max_retries = config.max_retries,
            "Executing attempt"
        );

        match operation(attempt).await {
            Ok(value) => {
                state.record(attempt, AttemptOutcome::Succeeded, Duration::ZERO);
                return (Ok(value), state);
            }
            Err(error) => match after_failure(config, &mut state, attempt, &error) {
                Next::Stop => return (Err(error), state),
                Next::Sleep(wait) => tokio::time::sleep(wait).await,
            },
        }

        attempt += 1;
    }
}

/// Execute an async operation with retries.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    with_retry_state(config, operation).await.0
}

/// Blocking counterpart of [`with_retry_state`]; backoff blocks the calling
/// thread.
pub fn with_retry_state_blocking<F, T, E>(
    config: &RetryConfig,
    mut operation: F,
) -> (Result<T, E>, AttemptState)
where
    F: FnMut(u32) -> Result<T, E>,
    E: Retryable + Display,
{
    let mut state = AttemptState::new();
    let mut attempt = 0;

    loop {
        debug!(
            attempt,
            max_retries = config.max_retries,
            "Executing attempt"
        );

        match operation(attempt) {
            Ok(value) => {
                state.record(attempt, AttemptOutcome::Succeeded, Duration::ZERO);
                return (Ok(value), state);
            }
            Err(error) => match after_failure(config, &mut state, attempt, &error) {
                Next::Stop => return (Err(error), state),
                Next::Sleep(wait) => std::thread::sleep(wait),
            },
        }

        attempt += 1;
    }
}

/// Blocking counterpart of [`with_retry`].
pub fn with_retry_blocking<F, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    E: Retryable + Display,
{
    with_retry_state_blocking(config, operation).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fmt;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Transient,
        Fatal,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Transient => f.write_str("transient"),
                Self::Fatal => f.write_str("fatal"),
            }
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[tokio::test]
    async fn test_with_retry_immediate_success() {
        let config = RetryConfig::new().max_retries(3);
        let (result, state) =
            with_retry_state(&config, |_| async { Ok::<_, TestError>(42) }).await;
        assert_eq!(result, Ok(42));
        assert_eq!(state.attempts, 1);
        assert_eq!(state.total_wait, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_eventual_success() {
        let config = RetryConfig::new()
            .max_retries(3)
            .initial_delay(Duration::from_secs(1));

        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let (result, state) = with_retry_state(&config, |attempt| {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    Err(TestError::Transient)
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            state.waits(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
        assert_eq!(state.total_wait, Duration::from_secs(3));
        assert!(state.last().unwrap().outcome.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_exhausted() {
        let config = RetryConfig::new()
            .max_retries(2)
            .initial_delay(Duration::from_millis(10));

        let (result, state) =
            with_retry_state(&config, |_| async { Err::<i32, _>(TestError::Transient) }).await;

        assert_eq!(result, Err(TestError::Transient));
        assert_eq!(state.attempts, 3);
        assert_eq!(
            state.last().unwrap().outcome,
            AttemptOutcome::Failed {
                reason: "transient".into()
            }
        );
        assert_eq!(
            state.waits(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[tokio::test]
    async fn test_with_retry_non_retryable() {
        let config = RetryConfig::new().max_retries(3);

        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = with_retry(&config, |_| {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Fatal)
            }
        })
        .await;

        assert_eq!(result, Err(TestError::Fatal));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleep_is_interruptible() {
        let config = RetryConfig::new()
            .max_retries(1)
            .initial_delay(Duration::from_secs(60));

        let timed = tokio::time::timeout(
            Duration::from_secs(1),
            with_retry(&config, |_| async { Err::<(), _>(TestError::Transient) }),
        )
        .await;

        assert!(timed.is_err());
    }

    #[test]
    fn test_blocking_retry() {
        let config = RetryConfig::new()
            .max_retries(2)
            .initial_delay(Duration::from_millis(1));

        let mut calls = 0;
        let (result, state) = with_retry_state_blocking(&config, |attempt| {
            calls += 1;
            if attempt == 0 {
                Err(TestError::Transient)
            } else {
                Ok("done")
            }
        });

        assert_eq!(result, Ok("done"));
        assert_eq!(calls, 2);
        assert_eq!(state.waits(), vec![Duration::from_millis(1)]);
    }

    #[test]
    fn test_blocking_no_retry() {
        let result = with_retry_blocking(&RetryConfig::no_retry(), |_| {
            Err::<(), _>(TestError::Transient)
        });
        assert_eq!(result, Err(TestError::Transient));
    }
}
