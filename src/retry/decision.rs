//! The value a retry policy hands back to the request loop.

use std::fmt;

use crate::consistency::Consistency;

/// What the caller must do after a failed attempt.
///
/// # Examples
///
/// ```rust
/// use replica_retry::{Consistency, RetryDecision};
///
/// let decision = RetryDecision::retry(Consistency::Quorum);
/// assert!(decision.is_retry());
/// assert_eq!(decision.consistency(), Some(Consistency::Quorum));
///
/// assert_eq!(RetryDecision::rethrow().consistency(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryDecision {
    /// Give up and surface the original failure unchanged.
    Rethrow,
    /// Re-issue the operation against the same coordinator at this consistency.
    Retry(Consistency),
    /// Re-issue the operation against a different coordinator at this consistency.
    TryNextHost(Consistency),
}

impl RetryDecision {
    /// Create a [`RetryDecision::Rethrow`].
    pub fn rethrow() -> Self {
        Self::Rethrow
    }

    /// Create a [`RetryDecision::Retry`].
    pub fn retry(consistency: Consistency) -> Self {
        Self::Retry(consistency)
    }

    /// Create a [`RetryDecision::TryNextHost`].
    pub fn try_next_host(consistency: Consistency) -> Self {
        Self::TryNextHost(consistency)
    }

    /// Returns true if the failure should be surfaced.
    pub fn is_rethrow(&self) -> bool {
        matches!(self, Self::Rethrow)
    }

    /// Returns true if the operation should be re-issued on the same coordinator.
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry(_))
    }

    /// Returns true if the operation should be re-issued on another coordinator.
    pub fn is_try_next_host(&self) -> bool {
        matches!(self, Self::TryNextHost(_))
    }

    /// The consistency to re-issue at, or `None` for [`RetryDecision::Rethrow`].
    pub fn consistency(&self) -> Option<Consistency> {
        match self {
            Self::Rethrow => None,
            Self::Retry(cl) | Self::TryNextHost(cl) => Some(*cl),
        }
    }
}

impl fmt::Display for RetryDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rethrow => f.write_str("rethrow"),
            Self::Retry(cl) => write!(f, "retry at {}", cl),
            Self::TryNextHost(cl) => write!(f, "retry next host at {}", cl),
        }
    }
}
