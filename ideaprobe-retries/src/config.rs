//! Retry configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::backoff::ExponentialBackoff;
use crate::error::{ConfigError, ConfigResult};

/// Environment variable overriding [`RetryConfig::max_retries`].
pub const MAX_RETRIES_ENV: &str = "MAX_RETRIES";
/// Environment variable overriding [`RetryConfig::initial_delay`], in seconds.
pub const RETRY_DELAY_ENV: &str = "RETRY_DELAY";

/// How many times to retry a transient failure and how long to wait.
///
/// Total attempts are `max_retries + 1`. Durations serialize as fractional
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay after the first failed attempt; doubles each time.
    #[serde(with = "duration_serde")]
    pub initial_delay: Duration,
    /// Optional cap on a single delay.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "option_duration_serde"
    )]
    pub max_delay: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: None,
        }
    }
}

impl RetryConfig {
    /// Create a new default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max retries.
    #[must_use]
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Cap every delay.
    #[must_use]
    pub fn max_delay(mut self, max: Duration) -> Self {
        self.max_delay = Some(max);
        self
    }

    /// Create config that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new().max_retries(0)
    }

    /// Total attempts allowed.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// The backoff schedule this config describes.
    #[must_use]
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_delay: self.initial_delay,
            max_delay: self.max_delay,
        }
    }

    /// Defaults overridden by `MAX_RETRIES` and `RETRY_DELAY` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but malformed.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but malformed.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_RETRIES_ENV) {
            config.max_retries = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(MAX_RETRIES_ENV, &raw, e))?;
        }

        if let Some(raw) = lookup(RETRY_DELAY_ENV) {
            let secs: f64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(RETRY_DELAY_ENV, &raw, e))?;
            config.initial_delay = Duration::try_from_secs_f64(secs)
                .map_err(|e| ConfigError::invalid(RETRY_DELAY_ENV, &raw, e))?;
        }

        Ok(config)
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

mod option_duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs_f64().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<f64> = Option::deserialize(deserializer)?;
        opt.map(Duration::try_from_secs_f64)
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
