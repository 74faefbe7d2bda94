//! Worker lifecycle
//!
//! A [`JobWorker`] owns the poller and dispatcher tasks of one open worker.
//! It is open from the moment [`JobWorkerBuilder::open`] returns until it is
//! disposed; there is no way back to open.
//!
//! Disposal abandons work: queued jobs are never dispatched (they stay in
//! the queue, and in [`JobWorker::queued_jobs`], until the handle is
//! dropped) and a handler that is running is left to finish on its own. Jobs that were never completed are
//! handed out again by the gateway after their timeout.
//! [`JobWorker::dispose_and_wait`] additionally waits for both loops to exit.
//!
//! [`JobWorkerBuilder::open`]: crate::JobWorkerBuilder::open

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::queue::JobQueue;
use crate::state::WorkerState;
use crate::stats::WorkerStats;

/// Handle to a running job worker
///
/// Dropping the handle disposes the worker.
#[derive(Debug)]
pub struct JobWorker {
    job_type: String,
    worker_name: String,
    state: Arc<WorkerState>,
    queue: Arc<JobQueue>,
    stats: Arc<WorkerStats>,
    poller: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
}

impl JobWorker {
    pub(crate) fn new(
        job_type: String,
        worker_name: String,
        state: Arc<WorkerState>,
        queue: Arc<JobQueue>,
        stats: Arc<WorkerStats>,
        poller: JoinHandle<()>,
        dispatcher: JoinHandle<()>,
    ) -> Self {
        Self {
            job_type,
            worker_name,
            state,
            queue,
            stats,
            poller: Some(poller),
            dispatcher: Some(dispatcher),
        }
    }

    /// Check if the worker is still polling and dispatching
    pub fn is_open(&self) -> bool {
        !self.state.is_closed()
    }

    /// Check if the worker has been disposed or stopped itself
    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Closes the worker without waiting for its loops
    ///
    /// Idempotent. Both loops observe the signal at their next check point.
    pub fn dispose(&self) {
        if self.state.close() {
            info!(
                "Worker '{}' for '{}' disposed ({} job(s) abandoned in queue)",
                self.worker_name,
                self.job_type,
                self.queue.len()
            );
        }
    }

    /// Closes the worker and waits until the poller and dispatcher have exited
    ///
    /// A handler running at the time of the call finishes first. Jobs still
    /// queued are not dispatched.
    pub async fn dispose_and_wait(mut self) {
        self.dispose();

        for handle in [self.poller.take(), self.dispatcher.take()].into_iter().flatten() {
            if let Err(e) = handle.await {
                warn!("Worker task for '{}' panicked: {}", self.job_type, e);
            }
        }
    }

    /// Type of jobs this worker activates
    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    /// Name reported to the gateway
    pub fn worker_name(&self) -> &str {
        &self.worker_name
    }

    /// Jobs activated but not yet handed to the handler
    pub fn queued_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Counters of this worker
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }
}

impl Drop for JobWorker {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::WorkerExt;
    use crate::error::WorkerError;
    use crate::test_support::{Activation, StubGateway, bounded, eventually, jobs};
    use flowgate_client::{Client, JobClient, StatusCode};
    use flowgate_core::domain::job::Job;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    fn client(gateway: &Arc<StubGateway>) -> Client {
        Client::with_gateway(Arc::clone(gateway) as Arc<dyn flowgate_client::Gateway>)
    }

    fn recording_handler(
        seen: Arc<Mutex<Vec<i64>>>,
    ) -> impl Fn(JobClient, Job) -> futures::future::Ready<anyhow::Result<()>> + Send + Sync + 'static
    {
        move |_client, job| {
            seen.lock().push(job.key);
            futures::future::ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_open_processes_first_batch() {
        let gateway =
            Arc::new(StubGateway::new().script(Activation::Batches(vec![jobs([1, 2, 3])])));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let worker = client(&gateway)
            .new_worker()
            .job_type("foo")
            .max_jobs_to_activate(1)
            .handler(recording_handler(Arc::clone(&seen)))
            .open()
            .unwrap();

        assert!(worker.is_open());
        assert!(!worker.is_closed());

        assert!(eventually(Duration::from_secs(2), || seen.lock().len() == 3).await);
        assert_eq!(*seen.lock(), vec![1, 2, 3]);

        worker.dispose_and_wait().await;
    }

    #[tokio::test]
    async fn test_every_job_across_polls_handled_once_in_order() {
        let gateway = Arc::new(
            StubGateway::new()
                .script(Activation::Batches(vec![jobs(1..=3), jobs(4..=4)]))
                .script(Activation::Batches(vec![]))
                .script(Activation::Batches(vec![jobs(5..=8), jobs(9..=10)])),
        );
        let seen = Arc::new(Mutex::new(Vec::new()));

        let worker = client(&gateway)
            .new_worker()
            .job_type("foo")
            .poll_interval(Duration::from_millis(10))
            .handler(recording_handler(Arc::clone(&seen)))
            .open()
            .unwrap();

        assert!(eventually(Duration::from_secs(2), || seen.lock().len() == 10).await);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(*seen.lock(), (1..=10).collect::<Vec<_>>());
        assert_eq!(worker.stats().jobs_activated(), 10);
        assert_eq!(worker.stats().jobs_dispatched(), 10);
        assert_eq!(worker.queued_jobs(), 0);

        worker.dispose_and_wait().await;
    }

    #[tokio::test]
    async fn test_activation_request_matches_configuration() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let worker = client(&gateway)
            .new_worker()
            .job_type("foo")
            .max_jobs_to_activate(5)
            .name("w")
            .timeout(Duration::from_millis(100))
            .poll_interval(Duration::from_millis(100))
            .handler(recording_handler(Arc::clone(&seen)))
            .open()
            .unwrap();

        assert!(eventually(Duration::from_secs(2), || gateway.activation_count() >= 1).await);
        {
            let activations = gateway.activations.lock();
            let request = &activations[0].0;
            assert_eq!(request.job_type, "foo");
            assert_eq!(request.max_jobs_to_activate, 5);
            assert_eq!(request.worker, "w");
            assert_eq!(request.timeout, 100);
            assert!(request.fetch_variable.is_empty());
        }

        worker.dispose_and_wait().await;
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let worker = client(&gateway)
            .new_worker()
            .job_type("foo")
            .handler(recording_handler(Arc::clone(&seen)))
            .open()
            .unwrap();

        for _ in 0..3 {
            worker.dispose();
            assert!(worker.is_closed());
            assert!(!worker.is_open());
        }

        bounded(worker.dispose_and_wait()).await;
    }

    #[tokio::test]
    async fn test_no_polling_after_dispose() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let worker = client(&gateway)
            .new_worker()
            .job_type("foo")
            .poll_interval(Duration::from_millis(10))
            .handler(recording_handler(Arc::clone(&seen)))
            .open()
            .unwrap();

        assert!(eventually(Duration::from_secs(2), || gateway.activation_count() >= 2).await);
        bounded(worker.dispose_and_wait()).await;

        let calls = gateway.activation_count();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gateway.activation_count(), calls);
    }

    #[tokio::test]
    async fn test_dropping_handle_closes_worker() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let worker = client(&gateway)
            .new_worker()
            .job_type("foo")
            .poll_interval(Duration::from_millis(10))
            .handler(recording_handler(Arc::clone(&seen)))
            .open()
            .unwrap();
        assert!(eventually(Duration::from_secs(2), || gateway.activation_count() >= 1).await);

        drop(worker);
        tokio::time::sleep(Duration::from_millis(30)).await;
        let calls = gateway.activation_count();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gateway.activation_count(), calls);
    }

    #[tokio::test]
    async fn test_transport_error_does_not_close_worker() {
        let gateway = Arc::new(
            StubGateway::new()
                .script(Activation::Fail(StatusCode::Unavailable))
                .script(Activation::Batches(vec![jobs([42])])),
        );
        let seen = Arc::new(Mutex::new(Vec::new()));

        let worker = client(&gateway)
            .new_worker()
            .job_type("foo")
            .poll_interval(Duration::from_millis(20))
            .handler(recording_handler(Arc::clone(&seen)))
            .open()
            .unwrap();

        assert!(eventually(Duration::from_secs(2), || seen.lock().len() == 1).await);
        assert!(worker.is_open());
        assert!(worker.stats().activation_calls() >= 2);

        worker.dispose_and_wait().await;
    }

    #[tokio::test]
    async fn test_disposing_client_closes_worker() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let client = client(&gateway);

        let worker = client
            .new_worker()
            .job_type("foo")
            .poll_interval(Duration::from_millis(10))
            .handler(recording_handler(Arc::clone(&seen)))
            .open()
            .unwrap();

        client.dispose();

        assert!(eventually(Duration::from_secs(2), || worker.is_closed()).await);
        bounded(worker.dispose_and_wait()).await;
    }

    #[tokio::test]
    async fn test_open_rejects_missing_job_type() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let result = client(&gateway)
            .new_worker()
            .handler(recording_handler(Arc::clone(&seen)))
            .open();

        assert!(matches!(result, Err(WorkerError::MissingJobType)));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(gateway.activation_count(), 0);
    }

    #[tokio::test]
    async fn test_open_rejects_missing_handler() {
        let gateway = Arc::new(StubGateway::new());

        let result = client(&gateway).new_worker().job_type("foo").open();

        assert!(matches!(result, Err(WorkerError::MissingHandler)));
    }

    #[tokio::test]
    async fn test_open_rejects_invalid_limits() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let result = client(&gateway)
            .new_worker()
            .job_type("foo")
            .max_jobs_to_activate(0)
            .handler(recording_handler(Arc::clone(&seen)))
            .open();

        assert!(matches!(result, Err(WorkerError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_open_rejects_zero_idle_wait() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let result = client(&gateway)
            .new_worker()
            .job_type("foo")
            .idle_wait(Duration::ZERO)
            .handler(recording_handler(Arc::clone(&seen)))
            .open();

        assert!(matches!(result, Err(WorkerError::InvalidConfig(_))));
        assert_eq!(gateway.activation_count(), 0);
    }

    #[tokio::test]
    async fn test_open_on_disposed_client_fails() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let client = client(&gateway);
        client.dispose();

        let result = client
            .new_worker()
            .job_type("foo")
            .handler(recording_handler(Arc::clone(&seen)))
            .open();

        match result {
            Err(WorkerError::Client(e)) => assert!(e.is_disposed()),
            other => panic!("expected disposed client error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_open_outside_runtime_fails() {
        let gateway = Arc::new(StubGateway::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let result = client(&gateway)
            .new_worker()
            .job_type("foo")
            .handler(recording_handler(Arc::clone(&seen)))
            .open();

        assert!(matches!(result, Err(WorkerError::NoRuntime)));
    }
}
