//! Property-based tests for exponential backoff decisions.
//!
//! Vocabulary values come from the crate's own `Arbitrary` impls, so this
//! suite needs the `proptest` feature.

use proptest::prelude::*;
use replica_retry::{
    Cancellation, ConfigError, Consistency, ExponentialRetryPolicy, ReadTimeout, RequestError,
    RetryCondition, RetryDecision, RetryPolicy, Unavailable, WriteTimeout, WriteType,
};
use std::time::Duration;

/// (base_ms, max_ms) with 0 < base <= max
fn arb_delays() -> impl Strategy<Value = (u64, u64)> {
    (1u64..=10_000, 0u64..=1_000_000).prop_map(|(base, extra)| (base, base + extra))
}

fn policy(base_ms: u64, max_ms: u64, condition: RetryCondition) -> ExponentialRetryPolicy {
    ExponentialRetryPolicy::new(
        Duration::from_millis(base_ms),
        Duration::from_millis(max_ms),
        condition,
    )
    .unwrap()
}

/// Current-thread runtime on a paused clock: backoff sleeps finish instantly.
fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_delay_within_bounds((base, max) in arb_delays(), attempt in 0u32..256) {
        let policy = policy(base, max, RetryCondition::ReadWriteTimeouts);
        let delay = policy.backoff_delay(attempt);

        prop_assert!(delay >= Duration::from_millis(base));
        prop_assert!(delay <= Duration::from_millis(max));
    }

    #[test]
    fn prop_delay_is_non_decreasing((base, max) in arb_delays(), attempt in 0u32..256) {
        let policy = policy(base, max, RetryCondition::ReadWriteTimeouts);

        prop_assert!(policy.backoff_delay(attempt) <= policy.backoff_delay(attempt + 1));
    }

    #[test]
    fn prop_delay_matches_closed_form((base, max) in arb_delays(), attempt in 0u32..256) {
        let policy = policy(base, max, RetryCondition::ReadWriteTimeouts);

        let expected_ms = 2u128
            .checked_pow(attempt)
            .and_then(|factor| factor.checked_mul(u128::from(base)))
            .map_or(u128::from(max), |raw| raw.min(u128::from(max)));

        prop_assert_eq!(policy.backoff_delay(attempt).as_millis(), expected_ms);
    }

    #[test]
    fn prop_budget_bounds_retries(
        (base, max) in arb_delays(),
        max_retries in 0u32..50,
        attempt in 0u32..100,
    ) {
        let policy = policy(base, max, RetryCondition::ReadWriteTimeouts)
            .with_max_retries(max_retries);

        prop_assert_eq!(policy.delay_for_retry(attempt).is_some(), attempt < max_retries);
    }

    #[test]
    fn prop_unbounded_budget_never_exhausts((base, max) in arb_delays(), attempt in any::<u32>()) {
        let policy = policy(base, max, RetryCondition::ReadWriteTimeouts);

        prop_assert!(policy.delay_for_retry(attempt).is_some());
    }

    #[test]
    fn prop_max_below_base_rejected(base in 1u64..10_000, seed in any::<u64>()) {
        let max = seed % base;
        let result = ExponentialRetryPolicy::new(
            Duration::from_millis(base),
            Duration::from_millis(max),
            RetryCondition::ReadWriteTimeouts,
        );

        let is_max_below_base = matches!(result, Err(ConfigError::MaxDelayBelowBase { .. }));
        prop_assert!(is_max_below_base);
    }

    #[test]
    fn prop_zero_base_rejected(max in 0u64..1_000_000) {
        let result = ExponentialRetryPolicy::new(
            Duration::ZERO,
            Duration::from_millis(max),
            RetryCondition::ReadWriteTimeouts,
        );

        prop_assert_eq!(result, Err(ConfigError::ZeroBaseDelay));
    }

    #[test]
    fn prop_unavailable_always_redirects_unchanged(
        (base, max) in arb_delays(),
        condition in any::<RetryCondition>(),
        cl in any::<Consistency>(),
        required in any::<u32>(),
        alive in any::<u32>(),
        retries in any::<u32>(),
    ) {
        let policy = policy(base, max, condition).with_max_retries(0);
        let failure = Unavailable {
            consistency: cl,
            required_replicas: required,
            alive_replicas: alive,
        };

        let decision = tokio_test::block_on(
            policy.on_unavailable(failure, retries, &Cancellation::never()),
        );

        prop_assert_eq!(decision, RetryDecision::TryNextHost(cl));
    }

    #[test]
    fn prop_request_error_always_redirects_unchanged(
        condition in any::<RetryCondition>(),
        cl in any::<Consistency>(),
        retries in any::<u32>(),
        message in "[a-z ]{0,32}",
    ) {
        let policy = policy(200, 30_000, condition).with_max_retries(0);
        let io = std::io::Error::other(message);
        let failure = RequestError { consistency: cl, error: &io };

        let decision = tokio_test::block_on(
            policy.on_request_error(failure, retries, &Cancellation::never()),
        );

        prop_assert_eq!(decision, RetryDecision::TryNextHost(cl));
    }

    #[test]
    fn prop_excluded_class_always_rethrows(
        cl in any::<Consistency>(),
        write_type in any::<WriteType>(),
        retries in any::<u32>(),
    ) {
        let reads_only = policy(200, 30_000, RetryCondition::ReadTimeout);
        let writes_only = policy(200, 30_000, RetryCondition::WriteTimeout);
        let cancel = Cancellation::never();

        let write = WriteTimeout {
            consistency: cl,
            write_type,
            required_acks: 2,
            received_acks: 1,
        };
        let read = ReadTimeout {
            consistency: cl,
            required_responses: 2,
            received_responses: 1,
            data_retrieved: true,
        };

        prop_assert_eq!(
            tokio_test::block_on(reads_only.on_write_timeout(write, retries, &cancel)),
            RetryDecision::Rethrow
        );
        prop_assert_eq!(
            tokio_test::block_on(writes_only.on_read_timeout(read, retries, &cancel)),
            RetryDecision::Rethrow
        );
    }

    #[test]
    fn prop_within_budget_retries_at_same_consistency(
        cl in any::<Consistency>(),
        max_retries in 1u32..20,
        retries_seed in any::<u32>(),
    ) {
        let policy = policy(1, 1_000, RetryCondition::ReadWriteTimeouts)
            .with_max_retries(max_retries);
        let retries = retries_seed % max_retries;
        let read = ReadTimeout {
            consistency: cl,
            required_responses: 3,
            received_responses: 0,
            data_retrieved: false,
        };

        let decision = paused_runtime().block_on(
            policy.on_read_timeout(read, retries, &Cancellation::never()),
        );

        prop_assert_eq!(decision, RetryDecision::Retry(cl));
    }
}
