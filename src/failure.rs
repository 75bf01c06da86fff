//! Classified failure signals handed to a retry policy.
//!
//! Classification happens in the host client: it knows its protocol error
//! codes and maps them onto these shapes through [`Classify`]. Policies
//! never look at the raw error beyond what is carried here.

use std::error::Error;

use crate::consistency::{Consistency, WriteType};

/// The coordinator did not gather enough replica responses for a read in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTimeout {
    /// Consistency the read was issued at.
    pub consistency: Consistency,
    /// Responses needed to satisfy `consistency`.
    pub required_responses: u32,
    /// Responses received before the timeout.
    pub received_responses: u32,
    /// Whether the replica asked for data actually answered.
    pub data_retrieved: bool,
}

/// The coordinator did not gather enough replica acknowledgements for a write in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteTimeout {
    /// Consistency the write was issued at.
    pub consistency: Consistency,
    /// The kind of write that timed out.
    pub write_type: WriteType,
    /// Acknowledgements needed to satisfy `consistency`.
    pub required_acks: u32,
    /// Acknowledgements received before the timeout.
    pub received_acks: u32,
}

/// The coordinator knew up front that too few replicas were alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unavailable {
    /// Consistency the operation was issued at.
    pub consistency: Consistency,
    /// Replicas needed to satisfy `consistency`.
    pub required_replicas: u32,
    /// Replicas the coordinator believed alive.
    pub alive_replicas: u32,
}

/// Any other transport or protocol level failure.
#[derive(Debug, Clone, Copy)]
pub struct RequestError<'a> {
    /// Consistency the operation was issued at.
    pub consistency: Consistency,
    /// The underlying error, for policies that want to inspect it.
    pub error: &'a (dyn Error + Send + Sync + 'static),
}

/// A failure as seen by the retry machinery.
#[derive(Debug, Clone, Copy)]
pub enum Failure<'a> {
    /// See [`ReadTimeout`].
    ReadTimeout(ReadTimeout),
    /// See [`WriteTimeout`].
    WriteTimeout(WriteTimeout),
    /// See [`Unavailable`].
    Unavailable(Unavailable),
    /// See [`RequestError`].
    Request(RequestError<'a>),
    /// A failure no policy may retry (syntax error, authorization, ...).
    Fatal,
}

impl Failure<'_> {
    /// Consistency the failed operation ran at, if the failure carries one.
    pub fn consistency(&self) -> Option<Consistency> {
        match self {
            Failure::ReadTimeout(f) => Some(f.consistency),
            Failure::WriteTimeout(f) => Some(f.consistency),
            Failure::Unavailable(f) => Some(f.consistency),
            Failure::Request(f) => Some(f.consistency),
            Failure::Fatal => None,
        }
    }
}

/// Maps a host error type onto a [`Failure`].
///
/// # Example
///
/// ```rust
/// use replica_retry::{Classify, Consistency, Failure, Unavailable};
///
/// #[derive(Debug)]
/// enum StoreError {
///     Unavailable { alive: u32 },
///     Syntax(String),
/// }
///
/// impl Classify for StoreError {
///     fn classify(&self) -> Failure<'_> {
///         match self {
///             StoreError::Unavailable { alive } => Failure::Unavailable(Unavailable {
///                 consistency: Consistency::Quorum,
///                 required_replicas: 2,
///                 alive_replicas: *alive,
///             }),
///             StoreError::Syntax(_) => Failure::Fatal,
///         }
///     }
/// }
///
/// assert!(matches!(
///     StoreError::Syntax("SELEC".into()).classify(),
///     Failure::Fatal
/// ));
/// ```
pub trait Classify {
    /// Classify this error for the retry policy.
    fn classify(&self) -> Failure<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_consistency() {
        let read = Failure::ReadTimeout(ReadTimeout {
            consistency: Consistency::Quorum,
            required_responses: 2,
            received_responses: 1,
            data_retrieved: false,
        });
        assert_eq!(read.consistency(), Some(Consistency::Quorum));

        let io = std::io::Error::other("connection reset");
        let request = Failure::Request(RequestError {
            consistency: Consistency::One,
            error: &io,
        });
        assert_eq!(request.consistency(), Some(Consistency::One));

        assert_eq!(Failure::Fatal.consistency(), None);
    }
}
