//! Job Client facade
//!
//! The handle passed to job handlers. It issues completion, failure and
//! retry-update commands bound to a job key, and is shared with the worker
//! that activates the jobs.

use flowgate_core::domain::job::JobKey;
use flowgate_core::dto::job::ActivateJobsRequest;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::commands::{CompleteJobCommand, FailJobCommand, UpdateRetriesCommand};
use crate::error::{ClientError, Result};
use crate::gateway::{ActivationStream, Gateway};

/// Issues job outcome commands against the gateway
///
/// Cheap to clone; all clones share the gateway connection and the disposal
/// flag of the [`Client`](crate::Client) they came from.
#[derive(Clone)]
pub struct JobClient {
    gateway: Arc<dyn Gateway>,
    disposed: Arc<AtomicBool>,
}

impl JobClient {
    pub(crate) fn new(gateway: Arc<dyn Gateway>, disposed: Arc<AtomicBool>) -> Self {
        Self { gateway, disposed }
    }

    /// Starts building a completion for the job
    pub fn new_complete_job_command(&self, job_key: JobKey) -> CompleteJobCommand {
        CompleteJobCommand::new(self.clone(), job_key)
    }

    /// Starts building a failure report for the job
    pub fn new_fail_command(&self, job_key: JobKey) -> FailJobCommand {
        FailJobCommand::new(self.clone(), job_key)
    }

    /// Starts building a retries update for the job
    pub fn new_update_retries_command(&self, job_key: JobKey) -> UpdateRetriesCommand {
        UpdateRetriesCommand::new(self.clone(), job_key)
    }

    /// Issues one activation call
    ///
    /// Used by workers; fails with [`ClientError::Disposed`] once the owning
    /// client is disposed.
    pub async fn activate_jobs(&self, request: ActivateJobsRequest) -> Result<ActivationStream> {
        self.ensure_open()?;
        self.gateway.activate_jobs(request).await
    }

    /// Check whether the owning client has been disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Fails with [`ClientError::Disposed`] if the owning client is disposed
    pub fn ensure_open(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(ClientError::Disposed);
        }
        Ok(())
    }

    pub(crate) fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }
}

impl fmt::Debug for JobClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobClient")
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
