//! # replica-retry
//!
//! Retry and backoff decisions for clients of a replicated data store.
//!
//! When an operation fails with a coordinator timeout, too few live
//! replicas, or a transport error, a [`RetryPolicy`] decides what the
//! request loop does next: surface the failure, retry on the same
//! coordinator after a bounded backoff, or move on to another coordinator.
//!
//! ## Philosophy
//!
//! - **Pure decisions**: policies are immutable values; the only side
//!   effect is the backoff sleep, which suspends just the calling task
//! - **Caller-owned state**: the retry count and the cancellation signal
//!   come from the request loop, so one policy serves every request
//! - **Fail at construction**: invalid settings are rejected when a policy
//!   is built, never when it decides
//!
//! ## Quick Example
//!
//! ```rust
//! use replica_retry::{
//!     Cancellation, Consistency, ExponentialRetryPolicy, RetryDecision, RetryPolicy,
//!     WriteTimeout, WriteType,
//! };
//!
//! # tokio_test::block_on(async {
//! // 200ms base delay, 30s cap, both timeout classes, at most 2 retries
//! let policy = ExponentialRetryPolicy::default().with_max_retries(2);
//!
//! let failure = WriteTimeout {
//!     consistency: Consistency::Quorum,
//!     write_type: WriteType::Simple,
//!     required_acks: 2,
//!     received_acks: 1,
//! };
//!
//! // Budget spent: give up immediately, without sleeping.
//! let decision = policy
//!     .on_write_timeout(failure, 2, &Cancellation::never())
//!     .await;
//! assert_eq!(decision, RetryDecision::Rethrow);
//! # });
//! ```
//!
//! ## Features
//!
//! - `tracing`: debug events from the backoff path and `LoggingRetryPolicy`
//! - `serde`: (de)serialization of [`RetryConfig`] and the vocabulary enums
//! - `proptest`: `Arbitrary` implementations in [`testing`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cancel;
pub mod consistency;
pub mod executor;
pub mod failure;
pub mod retry;
pub mod testing;

// Re-exports
pub use cancel::{CancelHandle, Cancellation, Cancelled};
pub use consistency::{Consistency, ParseError, WriteType};
pub use failure::{Classify, Failure, ReadTimeout, RequestError, Unavailable, WriteTimeout};
#[cfg(feature = "tracing")]
pub use retry::LoggingRetryPolicy;
pub use retry::{
    ConfigError, ExponentialRetryPolicy, FallthroughRetryPolicy, RetryCondition, RetryConfig,
    RetryDecision, RetryPolicy,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancel::Cancellation;
    pub use crate::consistency::{Consistency, WriteType};
    pub use crate::failure::{
        Classify, Failure, ReadTimeout, RequestError, Unavailable, WriteTimeout,
    };
    pub use crate::retry::{
        ExponentialRetryPolicy, FallthroughRetryPolicy, RetryCondition, RetryDecision, RetryPolicy,
    };
}
