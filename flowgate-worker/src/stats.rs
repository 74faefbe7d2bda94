//! Worker counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the poller and dispatcher of one worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    activation_calls: AtomicU64,
    jobs_activated: AtomicU64,
    jobs_dispatched: AtomicU64,
    handler_failures: AtomicU64,
    idle_waits: AtomicU64,
}

impl WorkerStats {
    /// Activation calls issued, successful or not
    pub fn activation_calls(&self) -> u64 {
        self.activation_calls.load(Ordering::Relaxed)
    }

    /// Jobs received from the gateway and enqueued
    pub fn jobs_activated(&self) -> u64 {
        self.jobs_activated.load(Ordering::Relaxed)
    }

    /// Jobs handed to the handler
    pub fn jobs_dispatched(&self) -> u64 {
        self.jobs_dispatched.load(Ordering::Relaxed)
    }

    /// Handler invocations that returned an error or panicked
    pub fn handler_failures(&self) -> u64 {
        self.handler_failures.load(Ordering::Relaxed)
    }

    /// Times the dispatcher found the queue empty and parked
    pub fn idle_waits(&self) -> u64 {
        self.idle_waits.load(Ordering::Relaxed)
    }

    pub(crate) fn record_activation_call(&self) {
        self.activation_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_activated(&self, count: u64) {
        self.jobs_activated.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_dispatched(&self) {
        self.jobs_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_handler_failure(&self) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_idle_wait(&self) {
        self.idle_waits.fetch_add(1, Ordering::Relaxed);
    }
}
