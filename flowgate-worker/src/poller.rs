//! Job poller
//!
//! Issues activation calls for the worker's job type and enqueues every job
//! the gateway streams back. Transport failures are logged and the next cycle
//! proceeds as usual; only a disposed client stops the poller on its own.

use flowgate_client::retry::{RetryPolicy, retry};
use flowgate_client::{ActivationStream, ClientError, JobClient};
use flowgate_core::dto::job::ActivateJobsRequest;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::queue::JobQueue;
use crate::state::WorkerState;
use crate::stats::WorkerStats;

/// Polling loop of one worker
pub(crate) struct Poller {
    pub(crate) client: JobClient,
    pub(crate) request: ActivateJobsRequest,
    pub(crate) poll_interval: Duration,
    pub(crate) retry_policy: Option<RetryPolicy>,
    pub(crate) queue: Arc<JobQueue>,
    pub(crate) stats: Arc<WorkerStats>,
    pub(crate) state: Arc<WorkerState>,
}

impl Poller {
    /// Runs until the worker is closed
    pub(crate) async fn run(self) {
        info!(
            "Starting job poller for '{}' (interval: {:?})",
            self.request.job_type, self.poll_interval
        );

        while !self.state.is_closed() {
            debug!("Polling for '{}' jobs", self.request.job_type);

            let outcome = tokio::select! {
                _ = self.state.closed() => break,
                outcome = self.poll_once() => outcome,
            };

            match outcome {
                Ok(0) => debug!("No jobs available"),
                Ok(count) => debug!("Activated {} job(s)", count),
                Err(e) if e.is_disposed() => {
                    warn!("Gateway client disposed, closing worker");
                    self.state.close();
                    break;
                }
                Err(e) => warn!(
                    "Activation of '{}' jobs failed: {}",
                    self.request.job_type, e
                ),
            }

            tokio::select! {
                _ = self.state.closed() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        debug!("Job poller for '{}' stopped", self.request.job_type);
    }

    /// Performs one activation call and drains its whole response stream
    ///
    /// Jobs are enqueued as each batch arrives. On a mid-stream failure the
    /// jobs already enqueued stay queued.
    async fn poll_once(&self) -> Result<usize, ClientError> {
        let mut batches = self.activate().await?;
        let mut count = 0;

        while let Some(batch) = batches.next().await {
            let jobs = batch?.jobs;
            self.stats.record_activated(jobs.len() as u64);
            count += jobs.len();

            for job in jobs {
                self.queue.enqueue(job);
            }
        }

        Ok(count)
    }

    async fn activate(&self) -> Result<ActivationStream, ClientError> {
        let (client, request, stats) = (&self.client, &self.request, &self.stats);
        let call = move || {
            stats.record_activation_call();
            client.activate_jobs(request.clone())
        };

        match &self.retry_policy {
            Some(policy) => retry(policy, call).await,
            None => call().await,
        }
    }
}
