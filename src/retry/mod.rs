//! Retry policies for replicated data store clients.
//!
//! When an operation fails with an already-classified failure, the request
//! loop asks a [`RetryPolicy`] what to do next and gets back a
//! [`RetryDecision`]: surface the error, retry on the same coordinator, or
//! retry on the next one.
//!
//! - **Stateless**: policies are immutable values; the retry count travels
//!   with each call, so one instance serves every concurrent request
//! - **Bounded**: backoff is capped per attempt and the retry budget caps
//!   the count; wall-clock deadlines stay with the caller
//! - **Cancellable**: a backoff in progress gives up with
//!   [`RetryDecision::Rethrow`] as soon as the caller's [`Cancellation`]
//!   fires
//!
//! # Quick Start
//!
//! ```rust
//! use replica_retry::{
//!     Cancellation, Consistency, ExponentialRetryPolicy, ReadTimeout, RetryCondition,
//!     RetryDecision, RetryPolicy,
//! };
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let policy = ExponentialRetryPolicy::new(
//!     Duration::from_millis(1),
//!     Duration::from_millis(10),
//!     RetryCondition::ReadTimeout,
//! )
//! .unwrap()
//! .with_max_retries(3);
//!
//! let failure = ReadTimeout {
//!     consistency: Consistency::Quorum,
//!     required_responses: 2,
//!     received_responses: 1,
//!     data_retrieved: true,
//! };
//!
//! let cancel = Cancellation::never();
//! assert_eq!(
//!     policy.on_read_timeout(failure, 0, &cancel).await,
//!     RetryDecision::Retry(Consistency::Quorum)
//! );
//! assert_eq!(
//!     policy.on_read_timeout(failure, 3, &cancel).await,
//!     RetryDecision::Rethrow
//! );
//! # });
//! ```
//!
//! # Policies
//!
//! - [`ExponentialRetryPolicy`]: capped exponential backoff on timeouts,
//!   immediate redirect on unavailable and request errors
//! - [`FallthroughRetryPolicy`]: never retries
//! - `LoggingRetryPolicy` (feature `tracing`): logs the decisions of any
//!   wrapped policy
//!
//! # Error Types
//!
//! - [`ConfigError`]: returned when a policy is built from invalid settings
//!
//! [`Cancellation`]: crate::Cancellation

mod condition;
mod config;
mod decision;
mod error;
mod exponential;
mod fallthrough;
#[cfg(feature = "tracing")]
mod logging;
mod policy;

pub use condition::RetryCondition;
pub use config::{RetryConfig, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_DELAY_MS};
pub use decision::RetryDecision;
pub use error::ConfigError;
pub use exponential::ExponentialRetryPolicy;
pub use fallthrough::FallthroughRetryPolicy;
#[cfg(feature = "tracing")]
pub use logging::LoggingRetryPolicy;
pub use policy::RetryPolicy;
