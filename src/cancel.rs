//! Cancellation for the backoff delay.
//!
//! A retry policy may suspend the calling task while it backs off. The
//! caller owns the request deadline, so it also owns the trigger: firing a
//! [`CancelHandle`] wakes every [`Cancellation`] observing it, and any
//! backoff in progress gives up instead of finishing its sleep.
//!
//! # Example
//!
//! ```rust
//! use replica_retry::Cancellation;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let (handle, cancel) = Cancellation::new();
//! handle.cancel();
//!
//! assert!(cancel.is_cancelled());
//! assert!(cancel.sleep(Duration::from_secs(3600)).await.is_err());
//! # });
//! ```

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;

/// Observer side of a cancellation signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: Option<watch::Receiver<bool>>,
}

/// Trigger side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Returned by [`Cancellation::sleep`] when the sleep was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl Cancellation {
    /// Create a linked handle and observer.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (CancelHandle, Cancellation) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, Cancellation { rx: Some(rx) })
    }

    /// An observer that is never cancelled.
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// Returns true once the linked handle has fired.
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Completes when the linked handle fires.
    ///
    /// Never completes for [`Cancellation::never`] or when the handle was
    /// dropped without firing.
    pub async fn cancelled(&self) {
        if let Some(rx) = &self.rx {
            let mut rx = rx.clone();
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await
    }

    /// Sleep for `delay` on the tokio timer unless cancelled first.
    ///
    /// Only the calling task is suspended. Returns `Err(Cancelled)` as soon
    /// as the signal fires, including when it fired before the call.
    ///
    /// # Panics
    ///
    /// Panics when polled outside a tokio runtime with the time driver
    /// enabled. A thread-per-request host drives it with a current-thread
    /// runtime built with `enable_time()`, not with an executor-agnostic
    /// `block_on`.
    pub async fn sleep(&self, delay: Duration) -> Result<(), Cancelled> {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::never()
    }
}

impl CancelHandle {
    /// Fire the signal. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns true if [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// A fresh observer linked to this handle.
    pub fn observer(&self) -> Cancellation {
        Cancellation {
            rx: Some(self.tx.subscribe()),
        }
    }
}

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("backoff cancelled")
    }
}

impl std::error::Error for Cancelled {}
