//! Job handler abstraction
//!
//! A handler is the user's business logic for one job. It receives the
//! [`JobClient`] to report the outcome and the activated [`Job`].

use async_trait::async_trait;
use flowgate_client::JobClient;
use flowgate_core::domain::job::Job;
use std::future::Future;

/// Business logic invoked once per activated job
///
/// Any `async` closure or function taking `(JobClient, Job)` and returning
/// `anyhow::Result<()>` is a handler:
///
/// ```
/// use flowgate_client::JobClient;
/// use flowgate_core::domain::job::Job;
///
/// async fn handle(client: JobClient, job: Job) -> anyhow::Result<()> {
///     client.new_complete_job_command(job.key).send().await?;
///     Ok(())
/// }
/// # fn assert_handler<H: flowgate_worker::JobHandler>(_: H) {}
/// # assert_handler(handle);
/// ```
///
/// An error (or a panic) is logged by the dispatcher and does not stop the
/// worker. The job then stays outstanding until the gateway's timeout hands it
/// out again, unless the handler already reported an outcome.
#[async_trait]
pub trait JobHandler: Send + Sync + 'static {
    async fn handle(&self, client: JobClient, job: Job) -> anyhow::Result<()>;
}

#[async_trait]
impl<F, Fut> JobHandler for F
where
    F: Fn(JobClient, Job) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn handle(&self, client: JobClient, job: Job) -> anyhow::Result<()> {
        (self)(client, job).await
    }
}
