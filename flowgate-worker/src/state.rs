//! Open/closed state shared by a worker and its loops

use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// Lifecycle flag plus the cancellation signal observed by both loops
///
/// The transition to closed is one-way.
#[derive(Debug, Default)]
pub(crate) struct WorkerState {
    closed: AtomicBool,
    cancel: CancellationToken,
}

impl WorkerState {
    /// Closes the worker and signals both loops
    ///
    /// Returns `true` only for the call that performed the transition.
    pub(crate) fn close(&self) -> bool {
        let first = !self.closed.swap(true, Ordering::AcqRel);
        self.cancel.cancel();
        first
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Resolves once the worker is closed
    pub(crate) async fn closed(&self) {
        self.cancel.cancelled().await;
    }
}
