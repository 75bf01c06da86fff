//! A policy that never retries.

use futures::future::BoxFuture;

use crate::cancel::Cancellation;
use crate::failure::{ReadTimeout, RequestError, Unavailable, WriteTimeout};

use super::decision::RetryDecision;
use super::policy::{decided, RetryPolicy};

/// Rethrows every failure.
///
/// Useful when retries are handled above the client, or when an operation
/// is known not to be idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallthroughRetryPolicy;

impl RetryPolicy for FallthroughRetryPolicy {
    fn on_read_timeout<'a>(
        &'a self,
        _failure: ReadTimeout,
        _retries: u32,
        _cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        decided(RetryDecision::Rethrow)
    }

    fn on_write_timeout<'a>(
        &'a self,
        _failure: WriteTimeout,
        _retries: u32,
        _cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        decided(RetryDecision::Rethrow)
    }

    fn on_unavailable<'a>(
        &'a self,
        _failure: Unavailable,
        _retries: u32,
        _cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        decided(RetryDecision::Rethrow)
    }

    fn on_request_error<'a>(
        &'a self,
        _failure: RequestError<'a>,
        _retries: u32,
        _cancel: &'a Cancellation,
    ) -> BoxFuture<'a, RetryDecision> {
        decided(RetryDecision::Rethrow)
    }
}
