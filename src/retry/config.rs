//! Plain-data settings for [`ExponentialRetryPolicy`].
//!
//! `RetryConfig` is what a host client loads from its own configuration
//! source. It carries raw values, including ones that would be invalid;
//! validation happens when it is turned into a policy.
//!
//! # Example
//!
//! ```rust
//! use replica_retry::{ExponentialRetryPolicy, RetryConfig};
//! use std::time::Duration;
//!
//! let config = RetryConfig {
//!     max_retries: Some(5),
//!     ..RetryConfig::default()
//! };
//! let policy = ExponentialRetryPolicy::from_config(&config).unwrap();
//!
//! assert_eq!(policy.base_delay(), Duration::from_millis(200));
//! assert_eq!(policy.max_retries(), Some(5));
//! ```

use std::time::Duration;

use super::condition::RetryCondition;
use super::error::ConfigError;
use super::exponential::ExponentialRetryPolicy;

/// Default base delay, in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: i64 = 200;

/// Default maximum delay, in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: i64 = 30_000;

/// Raw settings for an exponential backoff policy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RetryConfig {
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: i64,
    /// Upper bound on any single delay, in milliseconds.
    pub max_delay_ms: i64,
    /// Retry budget per logical request; `None` means unbounded.
    pub max_retries: Option<u32>,
    /// Which timeouts may be retried. Must be set.
    pub retry_condition: Option<RetryCondition>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            max_retries: None,
            retry_condition: Some(RetryCondition::default()),
        }
    }
}

impl RetryConfig {
    /// Check the settings without building a policy.
    ///
    /// Checks run in a fixed order and the first violation is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delays()?;
        self.condition()?;
        Ok(())
    }

    pub(crate) fn delays(&self) -> Result<(Duration, Duration), ConfigError> {
        if self.base_delay_ms < 0 || self.max_delay_ms < 0 {
            return Err(ConfigError::NegativeDelay {
                base_delay_ms: self.base_delay_ms,
                max_delay_ms: self.max_delay_ms,
            });
        }
        let base_delay = Duration::from_millis(self.base_delay_ms.unsigned_abs());
        let max_delay = Duration::from_millis(self.max_delay_ms.unsigned_abs());
        super::exponential::check_delays(base_delay, max_delay)?;
        Ok((base_delay, max_delay))
    }

    pub(crate) fn condition(&self) -> Result<RetryCondition, ConfigError> {
        self.retry_condition.ok_or(ConfigError::MissingRetryCondition)
    }
}

impl TryFrom<RetryConfig> for ExponentialRetryPolicy {
    type Error = ConfigError;

    fn try_from(config: RetryConfig) -> Result<Self, Self::Error> {
        ExponentialRetryPolicy::from_config(&config)
    }
}
