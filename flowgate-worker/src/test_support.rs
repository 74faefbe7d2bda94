//! Scripted gateway used by the worker tests

use async_trait::async_trait;
use flowgate_client::{ActivationStream, ClientError, Gateway, Result, StatusCode};
use flowgate_core::domain::job::Job;
use flowgate_core::dto::job::{
    ActivateJobsRequest, ActivateJobsResponse, CompleteJobRequest, FailJobRequest,
    UpdateJobRetriesRequest,
};
use futures::StreamExt;
use futures::stream;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::time::{Duration, Instant};

/// Outcome of one scripted activation call
pub(crate) enum Activation {
    /// The call streams these batches, in order
    Batches(Vec<Vec<Job>>),
    /// The call fails before streaming anything
    Fail(StatusCode),
    /// The call streams one batch and then fails
    FailAfter(Vec<Job>, StatusCode),
}

/// Gateway stub that replays scripted activations and records every call
///
/// Once the script is exhausted, activation calls return an empty stream.
#[derive(Default)]
pub(crate) struct StubGateway {
    script: Mutex<VecDeque<Activation>>,
    pub(crate) activations: Mutex<Vec<(ActivateJobsRequest, Instant)>>,
    pub(crate) completed: Mutex<Vec<CompleteJobRequest>>,
    pub(crate) failed: Mutex<Vec<FailJobRequest>>,
}

impl StubGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(self, activation: Activation) -> Self {
        self.script.lock().push_back(activation);
        self
    }

    pub(crate) fn activation_count(&self) -> usize {
        self.activations.lock().len()
    }

    pub(crate) fn completed_keys(&self) -> Vec<i64> {
        self.completed.lock().iter().map(|r| r.job_key).collect()
    }
}

#[async_trait]
impl Gateway for StubGateway {
    async fn activate_jobs(&self, request: ActivateJobsRequest) -> Result<ActivationStream> {
        self.activations.lock().push((request, Instant::now()));

        let next = self.script.lock().pop_front();
        match next {
            None => Ok(stream::empty().boxed()),
            Some(Activation::Batches(batches)) => Ok(stream::iter(
                batches
                    .into_iter()
                    .map(|jobs| Ok(ActivateJobsResponse { jobs })),
            )
            .boxed()),
            Some(Activation::Fail(status)) => {
                Err(ClientError::transport(status, "scripted failure"))
            }
            Some(Activation::FailAfter(jobs, status)) => Ok(stream::iter(vec![
                Ok(ActivateJobsResponse { jobs }),
                Err(ClientError::transport(status, "scripted stream failure")),
            ])
            .boxed()),
        }
    }

    async fn complete_job(&self, request: CompleteJobRequest) -> Result<()> {
        self.completed.lock().push(request);
        Ok(())
    }

    async fn fail_job(&self, request: FailJobRequest) -> Result<()> {
        self.failed.lock().push(request);
        Ok(())
    }

    async fn update_job_retries(&self, _request: UpdateJobRetriesRequest) -> Result<()> {
        Ok(())
    }
}

/// A job of type "foo" with the given key
pub(crate) fn job(key: i64) -> Job {
    Job {
        key,
        job_type: "foo".to_string(),
        process_instance_key: 1,
        bpmn_process_id: "process".to_string(),
        process_definition_version: 1,
        process_definition_key: 1,
        element_id: "task".to_string(),
        element_instance_key: key,
        custom_headers: "{}".to_string(),
        worker: "w".to_string(),
        retries: 3,
        deadline: 0,
        variables: "{}".to_string(),
    }
}

pub(crate) fn jobs(keys: impl IntoIterator<Item = i64>) -> Vec<Job> {
    keys.into_iter().map(job).collect()
}

/// Polls `condition` until it holds or `limit` elapses
pub(crate) async fn eventually(limit: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

/// Runs `future` with a generous upper bound so a hung test fails instead of stalling
pub(crate) async fn bounded<T>(future: impl Future<Output = T>) -> T {
    match tokio::time::timeout(Duration::from_secs(5), future).await {
        Ok(value) => value,
        Err(_) => panic!("test future did not finish within 5s"),
    }
}
