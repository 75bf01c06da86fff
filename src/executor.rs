//! A reference request loop driving a [`RetryPolicy`].
//!
//! Host clients usually embed this loop in their own executor, next to
//! coordinator selection. [`execute`] shows the contract in one place:
//! each failure is classified, handed to the policy together with the
//! number of retries so far, and the decision is acted on before the
//! policy is consulted again.

use std::future::Future;

use crate::cancel::Cancellation;
use crate::consistency::Consistency;
use crate::failure::{Classify, Failure};
use crate::retry::{RetryDecision, RetryPolicy};

/// Which coordinator an attempt should go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSelection {
    /// Keep the coordinator used by the previous attempt (or pick one for the first).
    Current,
    /// Move on to the next coordinator in the query plan.
    Next,
}

/// Parameters of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// Consistency to issue the operation at.
    pub consistency: Consistency,
    /// Retries performed before this attempt; 0 for the initial one.
    pub retries: u32,
    /// Coordinator selection for this attempt.
    pub host: HostSelection,
}

/// Run `op` until it succeeds or the policy gives up.
///
/// The error of the last attempt is returned unchanged, so the caller sees
/// the same failure it would have seen without a policy. [`Failure::Fatal`]
/// errors are returned without consulting the policy. Once `cancel` fires no
/// further attempt is issued, whatever the policy decided.
///
/// # Panics
///
/// Panics if a policy backoff runs outside a tokio runtime with the time
/// driver enabled; see [`Cancellation::sleep`].
///
/// # Example
///
/// ```rust
/// use replica_retry::executor::{execute, Attempt, HostSelection};
/// use replica_retry::{
///     Cancellation, Classify, Consistency, ExponentialRetryPolicy, Failure, Unavailable,
/// };
///
/// #[derive(Debug, PartialEq)]
/// struct NotEnoughReplicas;
///
/// impl Classify for NotEnoughReplicas {
///     fn classify(&self) -> Failure<'_> {
///         Failure::Unavailable(Unavailable {
///             consistency: Consistency::Quorum,
///             required_replicas: 2,
///             alive_replicas: 1,
///         })
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let policy = ExponentialRetryPolicy::default();
/// let result = execute(
///     &policy,
///     Consistency::Quorum,
///     &Cancellation::never(),
///     |attempt: Attempt| async move {
///         match attempt.host {
///             HostSelection::Current => Err(NotEnoughReplicas),
///             HostSelection::Next => Ok(attempt.retries),
///         }
///     },
/// )
/// .await;
///
/// assert_eq!(result, Ok(1));
/// # });
/// ```
pub async fn execute<P, T, E, F, Fut>(
    policy: &P,
    consistency: Consistency,
    cancel: &Cancellation,
    mut op: F,
) -> Result<T, E>
where
    P: RetryPolicy + ?Sized,
    E: Classify,
    F: FnMut(Attempt) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = Attempt {
        consistency,
        retries: 0,
        host: HostSelection::Current,
    };

    loop {
        let error = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let failure = error.classify();
        if matches!(failure, Failure::Fatal) {
            return Err(error);
        }

        let decision = policy.on_failure(failure, attempt.retries, cancel).await;

        #[cfg(feature = "tracing")]
        tracing::trace!(retries = attempt.retries, %decision, "retry policy decided");

        let (consistency, host) = match decision {
            RetryDecision::Rethrow => return Err(error),
            RetryDecision::Retry(cl) => (cl, HostSelection::Current),
            RetryDecision::TryNextHost(cl) => (cl, HostSelection::Next),
        };
        // Immediate decisions never observe the signal, so the loop must.
        if cancel.is_cancelled() {
            return Err(error);
        }
        attempt = Attempt {
            consistency,
            retries: attempt.retries.saturating_add(1),
            host,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::WriteType;
    use crate::failure::{ReadTimeout, RequestError, Unavailable, WriteTimeout};
    use crate::retry::{ExponentialRetryPolicy, FallthroughRetryPolicy, RetryCondition};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    enum StoreError {
        ReadTimeout,
        WriteTimeout,
        Unavailable,
        Io(String),
        Syntax,
    }

    impl std::fmt::Display for StoreError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                StoreError::Io(message) => write!(f, "io: {}", message),
                other => write!(f, "{:?}", other),
            }
        }
    }

    impl std::error::Error for StoreError {}

    impl Classify for StoreError {
        fn classify(&self) -> Failure<'_> {
            match self {
                StoreError::ReadTimeout => Failure::ReadTimeout(ReadTimeout {
                    consistency: Consistency::Quorum,
                    required_responses: 2,
                    received_responses: 1,
                    data_retrieved: false,
                }),
                StoreError::WriteTimeout => Failure::WriteTimeout(WriteTimeout {
                    consistency: Consistency::Quorum,
                    write_type: WriteType::Simple,
                    required_acks: 2,
                    received_acks: 0,
                }),
                StoreError::Unavailable => Failure::Unavailable(Unavailable {
                    consistency: Consistency::Quorum,
                    required_replicas: 2,
                    alive_replicas: 1,
                }),
                StoreError::Io(_) => Failure::Request(RequestError {
                    consistency: Consistency::Quorum,
                    error: self,
                }),
                StoreError::Syntax => Failure::Fatal,
            }
        }
    }

    /// Fails with the scripted errors in order, then succeeds.
    fn scripted(
        errors: Vec<StoreError>,
        seen: &Mutex<Vec<Attempt>>,
    ) -> impl FnMut(Attempt) -> futures::future::Ready<Result<&'static str, StoreError>> + '_ {
        let mut errors = errors.into_iter();
        move |attempt| {
            seen.lock().unwrap().push(attempt);
            futures::future::ready(match errors.next() {
                Some(error) => Err(error),
                None => Ok("rows"),
            })
        }
    }

    fn policy() -> ExponentialRetryPolicy {
        ExponentialRetryPolicy::new(
            Duration::from_millis(10),
            Duration::from_millis(100),
            RetryCondition::ReadWriteTimeouts,
        )
        .unwrap()
        .with_max_retries(3)
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_timeouts_on_same_host() {
        let seen = Mutex::new(Vec::new());
        let op = scripted(vec![StoreError::ReadTimeout, StoreError::WriteTimeout], &seen);

        let result = execute(&policy(), Consistency::Quorum, &Cancellation::never(), op).await;

        assert_eq!(result, Ok("rows"));
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].retries, 1);
        assert_eq!(seen[1].host, HostSelection::Current);
        assert_eq!(seen[2].retries, 2);
        assert!(seen.iter().all(|a| a.consistency == Consistency::Quorum));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_and_io_switch_host() {
        let seen = Mutex::new(Vec::new());
        let op = scripted(
            vec![StoreError::Unavailable, StoreError::Io("reset".into())],
            &seen,
        );

        let result = execute(&policy(), Consistency::One, &Cancellation::never(), op).await;

        assert_eq!(result, Ok("rows"));
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen[0].host, HostSelection::Current);
        assert_eq!(seen[1].host, HostSelection::Next);
        assert_eq!(seen[2].host, HostSelection::Next);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_returns_last_error() {
        let seen = Mutex::new(Vec::new());
        let op = scripted(
            (0..10).map(|_| StoreError::ReadTimeout).collect(),
            &seen,
        );

        let result = execute(&policy(), Consistency::Quorum, &Cancellation::never(), op).await;

        assert_eq!(result, Err(StoreError::ReadTimeout));
        assert_eq!(seen.into_inner().unwrap().len(), 4); // 1 initial + 3 retries
    }

    #[tokio::test]
    async fn test_fatal_errors_skip_the_policy() {
        let seen = Mutex::new(Vec::new());
        let op = scripted(vec![StoreError::Syntax], &seen);

        let result = execute(&policy(), Consistency::Quorum, &Cancellation::never(), op).await;

        assert_eq!(result, Err(StoreError::Syntax));
        assert_eq!(seen.into_inner().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fallthrough_surfaces_first_error() {
        let seen = Mutex::new(Vec::new());
        let op = scripted(vec![StoreError::Unavailable], &seen);

        let result = execute(
            &FallthroughRetryPolicy,
            Consistency::Quorum,
            &Cancellation::never(),
            op,
        )
        .await;

        assert_eq!(result, Err(StoreError::Unavailable));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_the_loop() {
        let (handle, cancel) = Cancellation::new();
        handle.cancel();
        let seen = Mutex::new(Vec::new());
        let op = scripted(vec![StoreError::WriteTimeout], &seen);

        let result = execute(&policy(), Consistency::Quorum, &cancel, op).await;

        assert_eq!(result, Err(StoreError::WriteTimeout));
        assert_eq!(seen.into_inner().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_stops_redirects() {
        let (handle, cancel) = Cancellation::new();
        handle.cancel();
        let seen = Mutex::new(Vec::new());
        let op = scripted(
            (0..10_000).map(|_| StoreError::Unavailable).collect(),
            &seen,
        );

        let result = execute(&policy(), Consistency::Quorum, &cancel, op).await;

        assert_eq!(result, Err(StoreError::Unavailable));
        assert_eq!(seen.into_inner().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_mid_request_stops_request_error_redirects() {
        let (handle, cancel) = Cancellation::new();
        let calls = Mutex::new(0u32);

        let result: Result<(), StoreError> = execute(
            &policy(),
            Consistency::One,
            &cancel,
            |_attempt: Attempt| {
                let mut calls = calls.lock().unwrap();
                *calls += 1;
                if *calls == 3 {
                    handle.cancel();
                }
                futures::future::ready(Err(StoreError::Io("reset".into())))
            },
        )
        .await;

        assert_eq!(result, Err(StoreError::Io("reset".into())));
        assert_eq!(*calls.lock().unwrap(), 3);
    }
}
