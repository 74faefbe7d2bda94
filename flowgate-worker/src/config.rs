//! Worker configuration
//!
//! Defines the activation parameters of a job worker and how often it polls.

use flowgate_core::dto::job::ActivateJobsRequest;
use std::time::Duration;

use crate::error::{Result, WorkerError};

/// Default number of jobs requested per activation call
pub const DEFAULT_MAX_JOBS_TO_ACTIVATE: i32 = 32;

/// Default time activated jobs stay locked to the worker
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default delay between activation calls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Job worker configuration
///
/// Only the job type is mandatory; everything else has a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Type of jobs this worker activates
    pub job_type: String,

    /// Name reported to the gateway as the jobs' owner
    pub worker_name: String,

    /// Upper bound of jobs handed out per activation call
    pub max_jobs_to_activate: i32,

    /// How long activated jobs stay locked to this worker
    pub timeout: Duration,

    /// Delay between activation calls
    pub poll_interval: Duration,

    /// How long the gateway may hold an activation call open
    pub request_timeout: Option<Duration>,

    /// Variables to fetch; empty fetches all
    pub fetch_variables: Vec<String>,
}

impl WorkerConfig {
    /// Creates a configuration for the given job type with defaults
    pub fn new(job_type: impl Into<String>) -> Self {
        Self {
            job_type: job_type.into(),
            ..Self::default()
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - FLOWGATE_JOB_TYPE (required)
    /// - FLOWGATE_WORKER_NAME (optional, default: generated)
    /// - FLOWGATE_MAX_JOBS (optional, default: 32)
    /// - FLOWGATE_TIMEOUT_MS (optional, default: 60000)
    /// - FLOWGATE_POLL_INTERVAL_MS (optional, default: 100)
    /// - FLOWGATE_REQUEST_TIMEOUT_MS (optional)
    /// - FLOWGATE_FETCH_VARIABLES (optional, comma separated)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup, using the same keys as [`from_env`]
    ///
    /// [`from_env`]: WorkerConfig::from_env
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let job_type = lookup("FLOWGATE_JOB_TYPE").ok_or(WorkerError::MissingJobType)?;
        let millis = |key: &str| {
            lookup(key)
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_millis)
        };

        let defaults = Self::default();

        Ok(Self {
            job_type,
            worker_name: lookup("FLOWGATE_WORKER_NAME").unwrap_or(defaults.worker_name),
            max_jobs_to_activate: lookup("FLOWGATE_MAX_JOBS")
                .and_then(|s| s.parse::<i32>().ok())
                .unwrap_or(defaults.max_jobs_to_activate),
            timeout: millis("FLOWGATE_TIMEOUT_MS").unwrap_or(defaults.timeout),
            poll_interval: millis("FLOWGATE_POLL_INTERVAL_MS").unwrap_or(defaults.poll_interval),
            request_timeout: millis("FLOWGATE_REQUEST_TIMEOUT_MS"),
            fetch_variables: lookup("FLOWGATE_FETCH_VARIABLES")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.job_type.trim().is_empty() {
            return Err(WorkerError::MissingJobType);
        }

        if self.worker_name.is_empty() {
            return Err(WorkerError::InvalidConfig(
                "worker_name cannot be empty".to_string(),
            ));
        }

        if self.max_jobs_to_activate <= 0 {
            return Err(WorkerError::InvalidConfig(
                "max_jobs_to_activate must be greater than 0".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(WorkerError::InvalidConfig(
                "timeout must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(WorkerError::InvalidConfig(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The activation request sent on every poll
    pub fn activation_request(&self) -> ActivateJobsRequest {
        ActivateJobsRequest {
            job_type: self.job_type.clone(),
            worker: self.worker_name.clone(),
            timeout: duration_millis(self.timeout),
            max_jobs_to_activate: self.max_jobs_to_activate,
            fetch_variable: self.fetch_variables.clone(),
            request_timeout: self.request_timeout.map(duration_millis),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self {
            job_type: String::new(),
            worker_name: format!("flowgate-worker-{}", &id[..8]),
            max_jobs_to_activate: DEFAULT_MAX_JOBS_TO_ACTIVATE,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
            fetch_variables: Vec::new(),
        }
    }
}

fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
