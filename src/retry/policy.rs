//! The retry policy contract.

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::cancel::Cancellation;
use crate::failure::{Failure, ReadTimeout, RequestError, Unavailable, WriteTimeout};

use super::decision::RetryDecision;

/// Decides, per failed attempt, whether and how to retry.
///
/// A policy is built once and shared by reference across every concurrent
/// request, so implementations keep no per-request state: the number of
/// retries already performed for the logical request is passed in on each
/// call. Decisions for one request are requested strictly one after the
/// other; the caller acts on a decision before asking for the next one.
///
/// The decision operations return futures because a policy may back off
/// before answering. A backoff must suspend only the calling task and must
/// give up with [`RetryDecision::Rethrow`] once `cancel` fires.
///
/// # Panics
///
/// Backoffs built on [`Cancellation::sleep`] use the tokio timer: a future
/// that reaches one panics unless polled inside a tokio runtime with the
/// time driver enabled. Decisions that need no delay are plain ready
/// futures and run on any executor.
///
/// # Example
///
/// ```rust
/// use replica_retry::{
///     Cancellation, Consistency, ExponentialRetryPolicy, RetryDecision, RetryPolicy, Unavailable,
/// };
///
/// # tokio_test::block_on(async {
/// let policy = ExponentialRetryPolicy::default();
/// let failure = Unavailable {
///     consistency: Consistency::Quorum,
///     required_replicas: 2,
///     alive_replicas: 1,
/// };
///
/// let decision = policy
///     .on_unavailable(failure, 0, &Cancellation::never())
///     .await;
/// assert_eq!(decision, RetryDecision::TryNextHost(Consistency::Quorum));
/// # });
/// ```
pub trait RetryPolicy: fmt::Debug + Send + Sync {
    /// Called once when the policy is attached to a running client.
    fn init(&self) {}

    /// Called once when the client shuts down.
    fn close(&self) {}

    /// A read timed out on the coordinator.
    fn on_read_timeout<'a>(
        &'a self,
        failure: ReadTimeout,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision>;

    /// A write timed out on the coordinator.
    fn on_write_timeout<'a>(
        &'a self,
        failure: WriteTimeout,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision>;

    /// The coordinator reported too few live replicas.
    fn on_unavailable<'a>(
        &'a self,
        failure: Unavailable,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision>;

    /// A transport or protocol error occurred.
    fn on_request_error<'a>(
        &'a self,
        failure: RequestError<'a>,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision>;

    /// Route a classified failure to the matching operation.
    ///
    /// [`Failure::Fatal`] is never offered to the policy and always rethrows.
    fn on_failure<'a>(
        &'a self,
        failure: Failure<'a>,
        retries: u32,
        cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        match failure {
            Failure::ReadTimeout(f) => self.on_read_timeout(f, retries, cancel),
            Failure::WriteTimeout(f) => self.on_write_timeout(f, retries, cancel),
            Failure::Unavailable(f) => self.on_unavailable(f, retries, cancel),
            Failure::Request(f) => self.on_request_error(f, retries, cancel),
            Failure::Fatal => decided(RetryDecision::Rethrow),
        }
    }
}

/// A decision that is available without waiting.
pub(crate) fn decided<'a>(decision: RetryDecision) -> BoxFuture<'a, RetryDecision> {
    futures::future::ready(decision).boxed()
}

macro_rules! forward_retry_policy {
    ($ptr:ident) => {
        impl<P: RetryPolicy + ?Sized> RetryPolicy for $ptr<P> {
            fn init(&self) {
                (**self).init()
            }

            fn close(&self) {
                (**self).close()
            }

            fn on_read_timeout<'a>(
                &'a self,
                failure: ReadTimeout,
                retries: u32,
                cancel: &'a Cancellation,
            ) -> BoxFuture<'a, RetryDecision> {
                (**self).on_read_timeout(failure, retries, cancel)
            }

            fn on_write_timeout<'a>(
                &'a self,
                failure: WriteTimeout,
                retries: u32,
                cancel: &'a Cancellation,
            ) -> BoxFuture<'a, RetryDecision> {
                (**self).on_write_timeout(failure, retries, cancel)
            }

            fn on_unavailable<'a>(
                &'a self,
                failure: Unavailable,
                retries: u32,
                cancel: &'a Cancellation,
            ) -> BoxFuture<'a, RetryDecision> {
                (**self).on_unavailable(failure, retries, cancel)
            }

            fn on_request_error<'a>(
                &'a self,
                failure: RequestError<'a>,
                retries: u32,
                cancel: &'a Cancellation,
            ) -> BoxFuture<'a, RetryDecision> {
                (**self).on_request_error(failure, retries, cancel)
            }

            fn on_failure<'a>(
                &'a self,
                failure: Failure<'a>,
                retries: u32,
                cancel: &'a Cancellation,
            ) -> BoxFuture<'a, RetryDecision> {
                (**self).on_failure(failure, retries, cancel)
            }
        }
    };
}

forward_retry_policy!(Arc);
forward_retry_policy!(Box);
