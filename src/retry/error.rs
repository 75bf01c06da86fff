//! Construction-time errors for retry policies.

use std::time::Duration;

/// Error returned when a retry policy is built from invalid settings.
///
/// These are raised once, at construction. A policy that was built
/// successfully never fails at decision time.
///
/// # Examples
///
/// ```rust
/// use replica_retry::{ConfigError, ExponentialRetryPolicy, RetryCondition};
/// use std::time::Duration;
///
/// let err = ExponentialRetryPolicy::new(
///     Duration::from_secs(1),
///     Duration::from_millis(10),
///     RetryCondition::ReadWriteTimeouts,
/// )
/// .unwrap_err();
///
/// assert!(matches!(err, ConfigError::MaxDelayBelowBase { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A delay was given as a negative number of milliseconds.
    NegativeDelay {
        /// The configured base delay in milliseconds.
        base_delay_ms: i64,
        /// The configured maximum delay in milliseconds.
        max_delay_ms: i64,
    },
    /// The base delay was zero.
    ZeroBaseDelay,
    /// The maximum delay was smaller than the base delay.
    MaxDelayBelowBase {
        /// The configured base delay.
        base_delay: Duration,
        /// The configured maximum delay.
        max_delay: Duration,
    },
    /// No retry condition was selected.
    MissingRetryCondition,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeDelay {
                base_delay_ms,
                max_delay_ms,
            } => write!(
                f,
                "invalid negative delay (base {}ms, max {}ms)",
                base_delay_ms, max_delay_ms
            ),
            Self::ZeroBaseDelay => write!(f, "base delay must be strictly positive"),
            Self::MaxDelayBelowBase {
                base_delay,
                max_delay,
            } => write!(
                f,
                "max delay (got {:?}) cannot be smaller than base delay (got {:?})",
                max_delay, base_delay
            ),
            Self::MissingRetryCondition => write!(f, "retry condition must be set"),
        }
    }
}

impl std::error::Error for ConfigError {}
