//! Job queue
//!
//! Unbounded FIFO between the poller (producer) and the dispatcher
//! (consumer). Enqueueing never blocks; dequeueing never blocks either, but
//! the consumer can park on [`JobQueue::wait_for_jobs`] until the producer
//! pushes again.

use flowgate_core::domain::job::Job;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

/// Thread-safe FIFO of activated jobs awaiting dispatch
#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: Mutex<VecDeque<Job>>,
    available: Notify,
}

impl JobQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a job to the tail and wakes a waiting consumer
    pub fn enqueue(&self, job: Job) {
        self.jobs.lock().push_back(job);
        self.available.notify_one();
    }

    /// Removes the head of the queue, if any
    pub fn try_dequeue(&self) -> Option<Job> {
        self.jobs.lock().pop_front()
    }

    /// Resolves once a job has been enqueued since the last wake-up
    ///
    /// A push that happened while nobody was waiting is remembered, so a
    /// consumer that checks `try_dequeue` and then waits cannot miss it.
    pub async fn wait_for_jobs(&self) {
        self.available.notified().await;
    }

    /// Number of jobs awaiting dispatch
    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    /// Check if no jobs are waiting
    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}
