//! Job worker builder
//!
//! Collects the worker configuration and the handler, then opens the worker.
//! Everything is validated at [`JobWorkerBuilder::open`].

use flowgate_client::retry::RetryPolicy;
use flowgate_client::{Client, JobClient};
use flowgate_core::dto::job::ActivateJobsRequest;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::WorkerConfig;
use crate::dispatcher::{DEFAULT_IDLE_WAIT, Dispatcher};
use crate::error::{Result, WorkerError};
use crate::handler::JobHandler;
use crate::poller::Poller;
use crate::queue::JobQueue;
use crate::state::WorkerState;
use crate::stats::WorkerStats;
use crate::worker::JobWorker;

/// Configures and opens a [`JobWorker`]
///
/// # Example
/// ```no_run
/// use flowgate_client::{Client, JobClient};
/// use flowgate_core::domain::job::Job;
/// use flowgate_worker::WorkerExt;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:8080");
///
/// let worker = client
///     .new_worker()
///     .job_type("payment-service")
///     .handler(|client: JobClient, job: Job| async move {
///         client.new_complete_job_command(job.key).send().await?;
///         anyhow::Ok(())
///     })
///     .max_jobs_to_activate(5)
///     .poll_interval(Duration::from_millis(200))
///     .open()?;
///
/// tokio::signal::ctrl_c().await?;
/// worker.dispose();
/// # Ok(())
/// # }
/// ```
pub struct JobWorkerBuilder {
    client: JobClient,
    config: WorkerConfig,
    handler: Option<Arc<dyn JobHandler>>,
    auto_complete: bool,
    retry_policy: Option<RetryPolicy>,
    idle_wait: Duration,
}

impl JobWorkerBuilder {
    /// Starts a builder with default configuration and no job type
    pub fn new(client: JobClient) -> Self {
        Self::from_config(client, WorkerConfig::default())
    }

    /// Starts a builder from an existing configuration
    pub fn from_config(client: JobClient, config: WorkerConfig) -> Self {
        Self {
            client,
            config,
            handler: None,
            auto_complete: false,
            retry_policy: None,
            idle_wait: DEFAULT_IDLE_WAIT,
        }
    }

    /// Sets the type of jobs to activate (required)
    pub fn job_type(mut self, job_type: impl Into<String>) -> Self {
        self.config.job_type = job_type.into();
        self
    }

    /// Sets the handler invoked for every job (required)
    pub fn handler(mut self, handler: impl JobHandler) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Sets the upper bound of jobs per activation call
    pub fn max_jobs_to_activate(mut self, max: i32) -> Self {
        self.config.max_jobs_to_activate = max;
        self
    }

    /// Sets the worker name reported to the gateway
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.worker_name = name.into();
        self
    }

    /// Sets how long activated jobs stay locked to this worker
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the delay between activation calls
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Lets the gateway hold each activation call open up to `timeout`
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Restricts the variables fetched with each job
    pub fn fetch_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fetch_variables = names.into_iter().map(Into::into).collect();
        self
    }

    /// Completes each job whose handler returned `Ok`
    pub fn auto_complete(mut self, enabled: bool) -> Self {
        self.auto_complete = enabled;
        self
    }

    /// Retries transient failures of each activation call
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Caps how long an idle dispatcher waits before rechecking the queue
    pub fn idle_wait(mut self, wait: Duration) -> Self {
        self.idle_wait = wait;
        self
    }

    /// The activation request the worker will send
    pub fn activation_request(&self) -> ActivateJobsRequest {
        self.config.activation_request()
    }

    /// Validates the configuration and starts polling and dispatching
    ///
    /// Must be called from within a Tokio runtime. Returns immediately; the
    /// worker is open when this returns `Ok`.
    pub fn open(self) -> Result<JobWorker> {
        self.client.ensure_open()?;
        if self.config.job_type.trim().is_empty() {
            return Err(WorkerError::MissingJobType);
        }
        let handler = self.handler.ok_or(WorkerError::MissingHandler)?;
        self.config.validate()?;
        if self.idle_wait.is_zero() {
            return Err(WorkerError::InvalidConfig(
                "idle_wait must be greater than 0".to_string(),
            ));
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| WorkerError::NoRuntime)?;

        let state = Arc::new(WorkerState::default());
        let queue = Arc::new(JobQueue::new());
        let stats = Arc::new(WorkerStats::default());

        let poller = Poller {
            client: self.client.clone(),
            request: self.config.activation_request(),
            poll_interval: self.config.poll_interval,
            retry_policy: self.retry_policy,
            queue: Arc::clone(&queue),
            stats: Arc::clone(&stats),
            state: Arc::clone(&state),
        };

        let dispatcher = Dispatcher {
            client: self.client,
            handler,
            auto_complete: self.auto_complete,
            idle_wait: self.idle_wait,
            queue: Arc::clone(&queue),
            stats: Arc::clone(&stats),
            state: Arc::clone(&state),
        };

        let poller = runtime.spawn(poller.run());
        let dispatcher = runtime.spawn(dispatcher.run());

        info!(
            "Opened worker '{}' for '{}' (max jobs: {}, poll interval: {:?})",
            self.config.worker_name,
            self.config.job_type,
            self.config.max_jobs_to_activate,
            self.config.poll_interval
        );

        Ok(JobWorker::new(
            self.config.job_type,
            self.config.worker_name,
            state,
            queue,
            stats,
            poller,
            dispatcher,
        ))
    }
}

/// Opens workers straight from a [`Client`]
pub trait WorkerExt {
    /// Starts building a job worker on this client
    fn new_worker(&self) -> JobWorkerBuilder;
}

impl WorkerExt for Client {
    fn new_worker(&self) -> JobWorkerBuilder {
        JobWorkerBuilder::new(self.job_client())
    }
}

impl WorkerExt for JobClient {
    fn new_worker(&self) -> JobWorkerBuilder {
        JobWorkerBuilder::new(self.clone())
    }
}
