//! Consistency requirements and write kinds reported by the data store.
//!
//! These are plain vocabulary types: the retry policies never interpret a
//! consistency level, they only hand it back to the caller (possibly
//! unchanged) as part of a [`RetryDecision`](crate::RetryDecision).
//!
//! # Example
//!
//! ```rust
//! use replica_retry::Consistency;
//!
//! let cl: Consistency = "local_quorum".parse().unwrap();
//! assert_eq!(cl, Consistency::LocalQuorum);
//! assert_eq!(cl.to_string(), "LOCAL_QUORUM");
//! assert!(cl.is_dc_local());
//! ```

use std::fmt;
use std::str::FromStr;

/// The replication-quorum level an operation demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Consistency {
    /// A write must reach at least one node, hinted handoff included.
    Any,
    /// One replica must respond.
    One,
    /// Two replicas must respond.
    Two,
    /// Three replicas must respond.
    Three,
    /// A majority of replicas across all data centers must respond.
    Quorum,
    /// Every replica must respond.
    All,
    /// A majority of replicas in the coordinator's data center must respond.
    LocalQuorum,
    /// A majority of replicas in each data center must respond.
    EachQuorum,
    /// Linearizable (lightweight transaction) consistency across data centers.
    Serial,
    /// Linearizable consistency within the local data center.
    LocalSerial,
    /// One replica in the local data center must respond.
    LocalOne,
}

impl Consistency {
    /// Every consistency level, in protocol order.
    pub const VARIANTS: [Consistency; 11] = [
        Consistency::Any,
        Consistency::One,
        Consistency::Two,
        Consistency::Three,
        Consistency::Quorum,
        Consistency::All,
        Consistency::LocalQuorum,
        Consistency::EachQuorum,
        Consistency::Serial,
        Consistency::LocalSerial,
        Consistency::LocalOne,
    ];

    /// The upper-snake name used on the wire and in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Consistency::Any => "ANY",
            Consistency::One => "ONE",
            Consistency::Two => "TWO",
            Consistency::Three => "THREE",
            Consistency::Quorum => "QUORUM",
            Consistency::All => "ALL",
            Consistency::LocalQuorum => "LOCAL_QUORUM",
            Consistency::EachQuorum => "EACH_QUORUM",
            Consistency::Serial => "SERIAL",
            Consistency::LocalSerial => "LOCAL_SERIAL",
            Consistency::LocalOne => "LOCAL_ONE",
        }
    }

    /// Returns true for the lightweight-transaction levels.
    pub fn is_serial(&self) -> bool {
        matches!(self, Consistency::Serial | Consistency::LocalSerial)
    }

    /// Returns true for levels scoped to the coordinator's data center.
    pub fn is_dc_local(&self) -> bool {
        matches!(
            self,
            Consistency::LocalQuorum | Consistency::LocalSerial | Consistency::LocalOne
        )
    }
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Consistency {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Consistency::VARIANTS
            .into_iter()
            .find(|cl| cl.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::new("consistency", s))
    }
}

/// The kind of write a coordinator was performing when it timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum WriteType {
    /// A single, non-batched, non-counter write.
    Simple,
    /// A logged batch; the batch log write itself succeeded.
    Batch,
    /// An unlogged batch.
    UnloggedBatch,
    /// A counter update.
    Counter,
    /// The batch log write of a logged batch timed out.
    BatchLog,
    /// A compare-and-set (lightweight transaction) write.
    Cas,
    /// A write to a base table with materialized views.
    View,
    /// A write to a table with change data capture enabled.
    Cdc,
}

impl WriteType {
    /// Every write type.
    pub const VARIANTS: [WriteType; 8] = [
        WriteType::Simple,
        WriteType::Batch,
        WriteType::UnloggedBatch,
        WriteType::Counter,
        WriteType::BatchLog,
        WriteType::Cas,
        WriteType::View,
        WriteType::Cdc,
    ];

    /// The upper-snake name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteType::Simple => "SIMPLE",
            WriteType::Batch => "BATCH",
            WriteType::UnloggedBatch => "UNLOGGED_BATCH",
            WriteType::Counter => "COUNTER",
            WriteType::BatchLog => "BATCH_LOG",
            WriteType::Cas => "CAS",
            WriteType::View => "VIEW",
            WriteType::Cdc => "CDC",
        }
    }
}

impl fmt::Display for WriteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WriteType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WriteType::VARIANTS
            .into_iter()
            .find(|wt| wt.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::new("write type", s))
    }
}

/// Error returned when a name does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: &'static str,
    value: String,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }

    /// What was being parsed ("consistency", "write type", ...).
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The rejected input.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseError {}
