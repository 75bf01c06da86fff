//! Which timeout classes a policy is allowed to retry.

use std::fmt;
use std::str::FromStr;

use crate::consistency::ParseError;

/// Selector for the retryable failure classes.
///
/// Only read and write timeouts are gated by this selector; unavailable and
/// request errors are always redirected to another coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RetryCondition {
    /// Retry read timeouts only.
    ReadTimeout,
    /// Retry write timeouts only.
    WriteTimeout,
    /// Retry both read and write timeouts.
    #[default]
    ReadWriteTimeouts,
}

impl RetryCondition {
    /// Returns true if read timeouts may be retried.
    pub fn retries_read_timeouts(&self) -> bool {
        matches!(self, Self::ReadTimeout | Self::ReadWriteTimeouts)
    }

    /// Returns true if write timeouts may be retried.
    pub fn retries_write_timeouts(&self) -> bool {
        matches!(self, Self::WriteTimeout | Self::ReadWriteTimeouts)
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::ReadTimeout => "read_timeout",
            Self::WriteTimeout => "write_timeout",
            Self::ReadWriteTimeouts => "read_write_timeouts",
        }
    }
}

impl fmt::Display for RetryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetryCondition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::ReadTimeout, Self::WriteTimeout, Self::ReadWriteTimeouts]
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::new("retry condition", s))
    }
}

#[cfg(test)]
mod condition_tests {
    use super::*;

    #[test]
    fn test_flags() {
        assert!(RetryCondition::ReadTimeout.retries_read_timeouts());
        assert!(!RetryCondition::ReadTimeout.retries_write_timeouts());
        assert!(!RetryCondition::WriteTimeout.retries_read_timeouts());
        assert!(RetryCondition::WriteTimeout.retries_write_timeouts());
        assert!(RetryCondition::ReadWriteTimeouts.retries_read_timeouts());
        assert!(RetryCondition::ReadWriteTimeouts.retries_write_timeouts());
    }

    #[test]
    fn test_default_retries_both() {
        assert_eq!(RetryCondition::default(), RetryCondition::ReadWriteTimeouts);
    }

    #[test]
    fn test_parse() {
        assert_eq!("read_timeout".parse(), Ok(RetryCondition::ReadTimeout));
        assert_eq!(
            "READ_WRITE_TIMEOUTS".parse(),
            Ok(RetryCondition::ReadWriteTimeouts)
        );
        let err = "unavailable".parse::<RetryCondition>().unwrap_err();
        assert_eq!(err.kind(), "retry condition");
    }
}
