//! Decision logging for any retry policy. Feature-gated behind `tracing`.

use futures::future::{BoxFuture, FutureExt};

use crate::cancel::Cancellation;
use crate::failure::{ReadTimeout, RequestError, Unavailable, WriteTimeout};

use super::decision::RetryDecision;
use super::policy::RetryPolicy;

/// Wraps a policy and logs every decision that is not a rethrow.
///
/// Rethrows are left to whoever surfaces the error. Events are emitted at
/// INFO with the failure counters, the retry count and the decision.
///
/// # Example
///
/// ```rust
/// use replica_retry::{ExponentialRetryPolicy, LoggingRetryPolicy, RetryPolicy};
/// use std::sync::Arc;
///
/// let policy: Arc<dyn RetryPolicy> =
///     Arc::new(LoggingRetryPolicy::new(ExponentialRetryPolicy::default()));
/// # let _ = policy;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggingRetryPolicy<P> {
    inner: P,
}

impl<P: RetryPolicy> LoggingRetryPolicy<P> {
    /// Wrap `inner`.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    /// The wrapped policy.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Unwrap the policy.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: RetryPolicy> RetryPolicy for LoggingRetryPolicy<P> {
    fn init(&self) {
        self.inner.init()
    }

    fn close(&self) {
        self.inner.close()
    }

    fn on_read_timeout<'a>(
        &'a self,
        failure: ReadTimeout,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        async move {
            let decision = self.inner.on_read_timeout(failure, retries, cancel).await;
            if !decision.is_rethrow() {
                tracing::info!(
                    consistency = %failure.consistency,
                    required = failure.required_responses,
                    received = failure.received_responses,
                    data_retrieved = failure.data_retrieved,
                    retries,
                    %decision,
                    "retrying on read timeout"
                );
            }
            decision
        }
        .boxed()
    }

    fn on_write_timeout<'a>(
        &'a self,
        failure: WriteTimeout,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        async move {
            let decision = self.inner.on_write_timeout(failure, retries, cancel).await;
            if !decision.is_rethrow() {
                tracing::info!(
                    consistency = %failure.consistency,
                    write_type = %failure.write_type,
                    required = failure.required_acks,
                    received = failure.received_acks,
                    retries,
                    %decision,
                    "retrying on write timeout"
                );
            }
            decision
        }
        .boxed()
    }

    fn on_unavailable<'a>(
        &'a self,
        failure: Unavailable,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        async move {
            let decision = self.inner.on_unavailable(failure, retries, cancel).await;
            if !decision.is_rethrow() {
                tracing::info!(
                    consistency = %failure.consistency,
                    required = failure.required_replicas,
                    alive = failure.alive_replicas,
                    retries,
                    %decision,
                    "retrying on unavailable"
                );
            }
            decision
        }
        .boxed()
    }

    fn on_request_error<'a>(
        &'a self,
        failure: RequestError<'a>,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        async move {
            let decision = self.inner.on_request_error(failure, retries, cancel).await;
            if !decision.is_rethrow() {
                tracing::info!(
                    consistency = %failure.consistency,
                    error = %failure.error,
                    retries,
                    %decision,
                    "retrying on request error"
                );
            }
            decision
        }
        .boxed()
    }
}
