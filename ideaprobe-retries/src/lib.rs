//! # ideaprobe-retries
//!
//! Bounded retries with deterministic exponential backoff.
//!
//! ## Core Concepts
//!
//! - **[`RetryConfig`]**: Retry count and delay schedule, overridable from the environment
//! - **[`ExponentialBackoff`]**: `initial_delay * 2^attempt`, optionally capped
//! - **[`Retryable`]**: Lets a failure decide whether another attempt is worthwhile
//! - **[`with_retry`]**: Execute attempts with automatic backoff
//! - **[`AttemptState`]**: Per-call history of attempts and waits
//!
//! Both an async executor (sleeping with tokio) and a blocking one (sleeping
//! on the calling thread) are provided.
//!
//! ## Example
//!
//! ```rust
//! use ideaprobe_retries::RetryConfig;
//! use std::time::Duration;
//!
//! let config = RetryConfig::new()
//!     .max_retries(3)
//!     .initial_delay(Duration::from_millis(500));
//!
//! let delays: Vec<_> = config.backoff().delays(config.max_retries).collect();
//! assert_eq!(
//!     delays,
//!     vec![
//!         Duration::from_millis(500),
//!         Duration::from_secs(1),
//!         Duration::from_secs(2),
//!     ]
//! );
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backoff;
pub mod config;
pub mod error;
pub mod executor;
pub mod strategy;

// Re-exports
pub use backoff::ExponentialBackoff;
pub use config::{RetryConfig, MAX_RETRIES_ENV, RETRY_DELAY_ENV};
pub use error::{ConfigError, ConfigResult};
pub use executor::{
    with_retry, with_retry_blocking, with_retry_state, with_retry_state_blocking, AttemptInfo,
    AttemptOutcome, AttemptState,
};
pub use strategy::Retryable;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        with_retry, with_retry_blocking, AttemptState, ExponentialBackoff, RetryConfig,
        Retryable,
    };
}
