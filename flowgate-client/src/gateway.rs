//! Gateway RPC abstraction
//!
//! The client and the worker only talk to the workflow engine through this
//! trait, so the transport can be swapped (or stubbed in tests).

use async_trait::async_trait;
use flowgate_core::dto::job::{
    ActivateJobsRequest, ActivateJobsResponse, CompleteJobRequest, FailJobRequest,
    UpdateJobRetriesRequest,
};
use futures::stream::BoxStream;

use crate::error::Result;

/// Sequence of job batches produced by one activation call
///
/// Finite per call and not restartable. A transport failure part way through
/// surfaces as an `Err` item.
pub type ActivationStream = BoxStream<'static, Result<ActivateJobsResponse>>;

/// Remote procedures the gateway offers for job handling
///
/// Implementations must support concurrent calls: a worker's poller and the
/// handlers it dispatches to share one gateway.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Starts an activation call for jobs matching the request
    async fn activate_jobs(&self, request: ActivateJobsRequest) -> Result<ActivationStream>;

    /// Marks a job as completed
    async fn complete_job(&self, request: CompleteJobRequest) -> Result<()>;

    /// Reports a failed job attempt
    async fn fail_job(&self, request: FailJobRequest) -> Result<()>;

    /// Overwrites the retries left on a job
    async fn update_job_retries(&self, request: UpdateJobRetriesRequest) -> Result<()>;
}
