//! Testing utilities for code that drives retry policies.
//!
//! This module provides assertion macros for [`RetryDecision`] values and,
//! with the `proptest` feature, `Arbitrary` implementations for the
//! vocabulary types so host clients can property-test their own policies.
//!
//! # Examples
//!
//! ```rust
//! use replica_retry::{assert_next_host, assert_rethrow, assert_retry};
//! use replica_retry::{Consistency, RetryDecision};
//!
//! assert_retry!(RetryDecision::Retry(Consistency::One), Consistency::One);
//! assert_next_host!(RetryDecision::TryNextHost(Consistency::All));
//! assert_rethrow!(RetryDecision::Rethrow);
//! ```
//!
//! [`RetryDecision`]: crate::RetryDecision

/// Assert that a decision is a same-host retry, optionally at a given consistency.
///
/// # Example
///
/// ```rust
/// use replica_retry::{assert_retry, Consistency, RetryDecision};
///
/// let decision = RetryDecision::retry(Consistency::Quorum);
/// assert_retry!(decision);
/// assert_retry!(decision, Consistency::Quorum);
/// ```
#[macro_export]
macro_rules! assert_retry {
    ($decision:expr) => {
        match $decision {
            $crate::RetryDecision::Retry(_) => {}
            other => panic!("Expected Retry, got {:?}", other),
        }
    };
    ($decision:expr, $consistency:expr) => {
        match $decision {
            $crate::RetryDecision::Retry(cl) => assert_eq!(cl, $consistency),
            other => panic!("Expected Retry({:?}), got {:?}", $consistency, other),
        }
    };
}

/// Assert that a decision redirects to the next host, optionally at a given consistency.
///
/// # Example
///
/// ```rust
/// use replica_retry::{assert_next_host, Consistency, RetryDecision};
///
/// let decision = RetryDecision::try_next_host(Consistency::LocalOne);
/// assert_next_host!(decision, Consistency::LocalOne);
/// ```
#[macro_export]
macro_rules! assert_next_host {
    ($decision:expr) => {
        match $decision {
            $crate::RetryDecision::TryNextHost(_) => {}
            other => panic!("Expected TryNextHost, got {:?}", other),
        }
    };
    ($decision:expr, $consistency:expr) => {
        match $decision {
            $crate::RetryDecision::TryNextHost(cl) => assert_eq!(cl, $consistency),
            other => panic!("Expected TryNextHost({:?}), got {:?}", $consistency, other),
        }
    };
}

/// Assert that a decision gives up.
///
/// # Example
///
/// ```rust
/// use replica_retry::{assert_rethrow, RetryDecision};
///
/// assert_rethrow!(RetryDecision::rethrow());
/// ```
#[macro_export]
macro_rules! assert_rethrow {
    ($decision:expr) => {
        match $decision {
            $crate::RetryDecision::Rethrow => {}
            other => panic!("Expected Rethrow, got {:?}", other),
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
use crate::{Consistency, RetryCondition, WriteType};

#[cfg(feature = "proptest")]
impl Arbitrary for Consistency {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        proptest::sample::select(Consistency::VARIANTS.to_vec()).boxed()
    }
}

#[cfg(feature = "proptest")]
impl Arbitrary for WriteType {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        proptest::sample::select(WriteType::VARIANTS.to_vec()).boxed()
    }
}

#[cfg(feature = "proptest")]
impl Arbitrary for RetryCondition {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(RetryCondition::ReadTimeout),
            Just(RetryCondition::WriteTimeout),
            Just(RetryCondition::ReadWriteTimeouts),
        ]
        .boxed()
    }
}
