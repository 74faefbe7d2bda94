//! Job dispatcher
//!
//! Takes jobs off the queue one at a time and runs the handler on each.
//! Handler errors and panics are contained here so one bad job never stops
//! dispatch of the next.

use flowgate_client::JobClient;
use flowgate_core::domain::job::Job;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::handler::JobHandler;
use crate::queue::JobQueue;
use crate::state::WorkerState;
use crate::stats::WorkerStats;

/// Upper bound on how long an idle dispatcher sleeps before rechecking the queue
pub(crate) const DEFAULT_IDLE_WAIT: Duration = Duration::from_millis(500);

/// Dispatch loop of one worker
pub(crate) struct Dispatcher {
    pub(crate) client: JobClient,
    pub(crate) handler: Arc<dyn JobHandler>,
    pub(crate) auto_complete: bool,
    pub(crate) idle_wait: Duration,
    pub(crate) queue: Arc<JobQueue>,
    pub(crate) stats: Arc<WorkerStats>,
    pub(crate) state: Arc<WorkerState>,
}

impl Dispatcher {
    /// Runs until the worker is closed
    ///
    /// Closing is observed between jobs; a running handler is not interrupted.
    pub(crate) async fn run(self) {
        info!("Starting job dispatcher");

        while !self.state.is_closed() {
            match self.queue.try_dequeue() {
                Some(job) => self.dispatch(job).await,
                None => {
                    self.stats.record_idle_wait();
                    tokio::select! {
                        _ = self.state.closed() => break,
                        _ = self.queue.wait_for_jobs() => {}
                        _ = tokio::time::sleep(self.idle_wait) => {}
                    }
                }
            }
        }

        let abandoned = self.queue.len();
        if abandoned > 0 {
            debug!("Job dispatcher stopped with {} job(s) left in queue", abandoned);
        } else {
            debug!("Job dispatcher stopped");
        }
    }

    async fn dispatch(&self, job: Job) {
        let key = job.key;
        debug!("Dispatching job {} ({} retries left)", key, job.retries);
        self.stats.record_dispatched();

        let outcome = AssertUnwindSafe(self.handler.handle(self.client.clone(), job))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {
                if self.auto_complete {
                    self.complete(key).await;
                }
            }
            Ok(Err(e)) => {
                self.stats.record_handler_failure();
                error!("Handler failed on job {}: {:#}", key, e);
            }
            Err(panic) => {
                self.stats.record_handler_failure();
                error!("Handler panicked on job {}: {}", key, panic_message(&*panic));
            }
        }
    }

    async fn complete(&self, key: i64) {
        if let Err(e) = self.client.new_complete_job_command(key).send().await {
            warn!("Failed to auto-complete job {}: {}", key, e);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
