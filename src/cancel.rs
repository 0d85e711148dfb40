//! Cancellation tokens shared across dispatch, flush, process, and run.
//!
//! Every externally reachable operation in [`crate::dispatcher`] takes a
//! [`CancellationToken`]. It is the Rust analogue of a Go `context.Context`:
//! cheaply cloneable, cancellable exactly once from any clone, and
//! observable both by polling ([`CancellationToken::is_cancelled`]) and by
//! selecting on a channel that closes at cancellation time
//! ([`CancellationToken::done`]), which is what lets [`crossbeam::select`]
//! race a dispatch send against cancellation.

use std::sync::{Arc, OnceLock};

use crossbeam::channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

/// Why a [`CancellationToken`] was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationReason {
    /// A caller explicitly cancelled the token.
    Cancelled,
    /// The token's deadline elapsed (reserved for callers that compose
    /// timeouts on top of a token; the core itself never sets this).
    DeadlineExceeded,
}

struct Inner {
    reason: OnceLock<CancellationReason>,
    // Dropping this sender closes every clone of `done_rx`, waking any
    // `select!` parked on it.
    done_tx: Mutex<Option<Sender<()>>>,
    done_rx: Receiver<()>,
}

/// A cheaply cloneable, once-cancellable handle threaded through every
/// dispatcher operation.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    /// Creates a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        let (done_tx, done_rx) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                reason: OnceLock::new(),
                done_tx: Mutex::new(Some(done_tx)),
                done_rx,
            }),
        }
    }

    /// Cancels the token. Idempotent: only the first call's reason sticks.
    pub fn cancel(&self, reason: CancellationReason) {
        let _ = self.inner.reason.set(reason);
        // Dropping the sender closes `done_rx` for every clone, which is
        // what `select!` on `done()` observes.
        self.inner.done_tx.lock().take();
    }

    /// Returns `true` once [`CancellationToken::cancel`] has been called on
    /// this token or any of its clones.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.reason.get().is_some()
    }

    /// Returns the cancellation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<CancellationReason> {
        self.inner.reason.get().copied()
    }

    /// A receiver that becomes readable (closed) exactly when the token is
    /// cancelled. Intended for use inside `crossbeam::select!`.
    #[must_use]
    pub fn done(&self) -> Receiver<()> {
        self.inner.done_rx.clone()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.reason().is_none());
    }

    #[test]
    fn cancel_is_observed_by_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel(CancellationReason::Cancelled);
        assert!(token.is_cancelled());
        assert_eq!(token.reason(), Some(CancellationReason::Cancelled));
    }

    #[test]
    fn first_cancel_reason_wins() {
        let token = CancellationToken::new();
        token.cancel(CancellationReason::Cancelled);
        token.cancel(CancellationReason::DeadlineExceeded);
        assert_eq!(token.reason(), Some(CancellationReason::Cancelled));
    }

    #[test]
    fn done_channel_closes_on_cancel() {
        let token = CancellationToken::new();
        let done = token.done();
        token.cancel(CancellationReason::Cancelled);
        assert!(done.recv().is_err());
    }
}
