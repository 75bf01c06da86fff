//! Bounded exponential backoff on read and write timeouts.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use crate::cancel::Cancellation;
use crate::consistency::Consistency;
use crate::failure::{ReadTimeout, RequestError, Unavailable, WriteTimeout};

use super::condition::RetryCondition;
use super::config::{RetryConfig, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_DELAY_MS};
use super::decision::RetryDecision;
use super::error::ConfigError;
use super::policy::{decided, RetryPolicy};

/// Retries timeouts on the same coordinator after an exponentially growing,
/// capped delay.
///
/// - Read and write timeouts are retried at the same consistency when the
///   [`RetryCondition`] allows it and the retry budget is not spent, after
///   sleeping `min(base_delay * 2^retries, max_delay)`.
/// - Unavailable and request errors are redirected to the next coordinator
///   immediately, with no delay.
///
/// The response and acknowledgement counters of a timeout are not consulted.
/// A policy that wants to refine the rule on them (for instance retrying a
/// read only when no data came back) can wrap or replace this one.
///
/// The policy is immutable once built and holds no per-request state, so a
/// single instance can be shared by every request in the process.
///
/// # Panics
///
/// A timeout decision that backs off sleeps on the tokio timer and panics
/// outside a tokio runtime with the time driver enabled. Rethrows and
/// redirects complete without one.
///
/// # Examples
///
/// ```rust
/// use replica_retry::{ExponentialRetryPolicy, RetryCondition};
/// use std::time::Duration;
///
/// let policy = ExponentialRetryPolicy::new(
///     Duration::from_millis(200),
///     Duration::from_secs(30),
///     RetryCondition::ReadWriteTimeouts,
/// )
/// .unwrap()
/// .with_max_retries(5);
///
/// assert_eq!(policy.backoff_delay(0), Duration::from_millis(200));
/// assert_eq!(policy.backoff_delay(7), Duration::from_millis(25_600));
/// assert_eq!(policy.backoff_delay(10), Duration::from_secs(30));
/// assert_eq!(policy.delay_for_retry(5), None); // budget spent
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialRetryPolicy {
    base_delay: Duration,
    max_delay: Duration,
    max_retries: Option<u32>,
    retry_condition: RetryCondition,
}

impl ExponentialRetryPolicy {
    /// Create a policy with an unbounded retry budget.
    ///
    /// Fails if `base_delay` is zero or `max_delay < base_delay`.
    pub fn new(
        base_delay: Duration,
        max_delay: Duration,
        retry_condition: RetryCondition,
    ) -> Result<Self, ConfigError> {
        check_delays(base_delay, max_delay)?;
        Ok(Self {
            base_delay,
            max_delay,
            max_retries: None,
            retry_condition,
        })
    }

    /// Build a policy from raw settings.
    pub fn from_config(config: &RetryConfig) -> Result<Self, ConfigError> {
        let (base_delay, max_delay) = config.delays()?;
        let retry_condition = config.condition()?;
        Ok(Self {
            base_delay,
            max_delay,
            max_retries: config.max_retries,
            retry_condition,
        })
    }

    /// Cap the number of retries per logical request.
    ///
    /// With `max_retries(n)` a timeout reported after `n` retries rethrows.
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    /// Remove the retry cap.
    pub fn with_unbounded_retries(mut self) -> Self {
        self.max_retries = None;
        self
    }

    /// Get the base delay.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Get the maximum delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Get the retry budget; `None` means unbounded.
    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Get the retry condition.
    pub fn retry_condition(&self) -> RetryCondition {
        self.retry_condition
    }

    /// The delay applied before retry number `retries` (0-indexed).
    ///
    /// Exactly `min(base_delay * 2^retries, max_delay)`, computed without
    /// overflow for any `retries`.
    pub fn backoff_delay(&self, retries: u32) -> Duration {
        let base = self.base_delay.as_nanos();
        let max = self.max_delay.as_nanos();

        // base > 0, so a shift that would drop high bits already exceeds max.
        if retries >= base.leading_zeros() {
            return self.max_delay;
        }
        let delay = base << retries;
        if delay >= max {
            return self.max_delay;
        }
        Duration::new(
            (delay / NANOS_PER_SEC) as u64,
            (delay % NANOS_PER_SEC) as u32,
        )
    }

    /// The delay before retry number `retries`, or `None` once the budget is spent.
    pub fn delay_for_retry(&self, retries: u32) -> Option<Duration> {
        match self.max_retries {
            Some(max) if retries >= max => None,
            _ => Some(self.backoff_delay(retries)),
        }
    }

    async fn backoff(
        &self,
        consistency: Consistency,
        retries: u32,
        cancel: &Cancellation,
    ) -> RetryDecision {
        let Some(delay) = self.delay_for_retry(retries) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                retries,
                max_retries = ?self.max_retries,
                "retry budget exhausted"
            );
            return RetryDecision::Rethrow;
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(retries, ?delay, %consistency, "backing off before retry");

        match cancel.sleep(delay).await {
            Ok(()) => RetryDecision::Retry(consistency),
            Err(_cancelled) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(retries, ?delay, "backoff cancelled, giving up");
                RetryDecision::Rethrow
            }
        }
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Shared delay validation for every constructor.
pub(crate) fn check_delays(base_delay: Duration, max_delay: Duration) -> Result<(), ConfigError> {
    if base_delay.is_zero() {
        return Err(ConfigError::ZeroBaseDelay);
    }
    if max_delay < base_delay {
        return Err(ConfigError::MaxDelayBelowBase {
            base_delay,
            max_delay,
        });
    }
    Ok(())
}

impl Default for ExponentialRetryPolicy {
    /// 200ms base, 30s cap, both timeout classes, unbounded retries.
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS.unsigned_abs()),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS.unsigned_abs()),
            max_retries: None,
            retry_condition: RetryCondition::ReadWriteTimeouts,
        }
    }
}

impl RetryPolicy for ExponentialRetryPolicy {
    fn on_read_timeout<'a>(
        &'a self,
        failure: ReadTimeout,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        if !self.retry_condition.retries_read_timeouts() {
            return decided(RetryDecision::Rethrow);
        }
        self.backoff(failure.consistency, retries, cancel).boxed()
    }

    fn on_write_timeout<'a>(
        &'a self,
        failure: WriteTimeout,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        if !self.retry_condition.retries_write_timeouts() {
            return decided(RetryDecision::Rethrow);
        }
        self.backoff(failure.consistency, retries, cancel).boxed()
    }

    fn on_unavailable<'a>(
        &'a self,
        failure: Unavailable,
        _retries: u32,
        _cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        decided(RetryDecision::TryNextHost(failure.consistency))
    }

    fn on_request_error<'a>(
        &'a self,
        failure: RequestError<'a>,
        _retries: u32,
        _cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        decided(RetryDecision::TryNextHost(failure.consistency))
    }
}
