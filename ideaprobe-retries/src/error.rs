//! Retry configuration errors.

use thiserror::Error;

/// An environment override could not be applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The variable is set but does not parse.
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        /// Environment variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid(var: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidValue {
            var,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::invalid("MAX_RETRIES", "lots", "not a number");
        assert_eq!(
            err.to_string(),
            "Invalid value for MAX_RETRIES: 'lots' (not a number)"
        );
    }
}
