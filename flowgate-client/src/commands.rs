//! One-shot job commands
//!
//! Each command is built from a [`JobClient`], configured with chained
//! setters and consumed by `send()`, which issues exactly one RPC.

use flowgate_core::domain::job::JobKey;
use flowgate_core::dto::job::{CompleteJobRequest, FailJobRequest, UpdateJobRetriesRequest};
use serde::Serialize;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::job_client::JobClient;
use crate::retry::{RetryPolicy, retry};

/// Completes a job, optionally merging variables into the process instance
#[must_use = "commands do nothing until sent"]
#[derive(Debug, Clone)]
pub struct CompleteJobCommand {
    client: JobClient,
    request: CompleteJobRequest,
}

impl CompleteJobCommand {
    pub(crate) fn new(client: JobClient, job_key: JobKey) -> Self {
        Self {
            client,
            request: CompleteJobRequest {
                job_key,
                variables: None,
            },
        }
    }

    /// Sets the variables as a raw JSON document
    pub fn variables(mut self, variables: impl Into<String>) -> Self {
        self.request.variables = Some(variables.into());
        self
    }

    /// Serializes a value as the variables document
    pub fn variables_json<T: Serialize>(self, variables: &T) -> Result<Self> {
        let json = serde_json::to_string(variables)
            .map_err(|e| ClientError::InvalidRequest(format!("Unserializable variables: {}", e)))?;
        Ok(self.variables(json))
    }

    /// The request that `send()` will issue
    pub fn request(&self) -> &CompleteJobRequest {
        &self.request
    }

    /// Sends the completion to the gateway
    pub async fn send(self) -> Result<()> {
        self.validate()?;
        debug!("Completing job {}", self.request.job_key);
        self.client.gateway().complete_job(self.request).await
    }

    /// Sends the completion, repeating it on transient failures
    pub async fn send_with_retry(self, policy: &RetryPolicy) -> Result<()> {
        self.validate()?;
        let (client, request) = (&self.client, &self.request);
        retry(policy, || async move {
            client.ensure_open()?;
            client.gateway().complete_job(request.clone()).await
        })
        .await
    }

    fn validate(&self) -> Result<()> {
        self.client.ensure_open()?;
        if let Some(variables) = &self.request.variables {
            validate_document(variables)?;
        }
        Ok(())
    }
}

/// Reports a failed job attempt with the retries left
#[must_use = "commands do nothing until sent"]
#[derive(Debug, Clone)]
pub struct FailJobCommand {
    client: JobClient,
    request: FailJobRequest,
}

impl FailJobCommand {
    pub(crate) fn new(client: JobClient, job_key: JobKey) -> Self {
        Self {
            client,
            request: FailJobRequest {
                job_key,
                retries: 0,
                error_message: None,
            },
        }
    }

    /// Sets the retries left; zero makes the gateway raise an incident
    pub fn retries(mut self, retries: i32) -> Self {
        self.request.retries = retries;
        self
    }

    /// Attaches a message describing the failure
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.request.error_message = Some(message.into());
        self
    }

    /// The request that `send()` will issue
    pub fn request(&self) -> &FailJobRequest {
        &self.request
    }

    /// Sends the failure to the gateway
    pub async fn send(self) -> Result<()> {
        self.validate()?;
        debug!(
            "Failing job {} ({} retries left)",
            self.request.job_key, self.request.retries
        );
        self.client.gateway().fail_job(self.request).await
    }

    /// Sends the failure, repeating it on transient failures
    pub async fn send_with_retry(self, policy: &RetryPolicy) -> Result<()> {
        self.validate()?;
        let (client, request) = (&self.client, &self.request);
        retry(policy, || async move {
            client.ensure_open()?;
            client.gateway().fail_job(request.clone()).await
        })
        .await
    }

    fn validate(&self) -> Result<()> {
        self.client.ensure_open()?;
        validate_retries(self.request.retries)
    }
}

/// Overwrites the retries left on a job
#[must_use = "commands do nothing until sent"]
#[derive(Debug, Clone)]
pub struct UpdateRetriesCommand {
    client: JobClient,
    request: UpdateJobRetriesRequest,
}

impl UpdateRetriesCommand {
    pub(crate) fn new(client: JobClient, job_key: JobKey) -> Self {
        Self {
            client,
            request: UpdateJobRetriesRequest {
                job_key,
                retries: 0,
            },
        }
    }

    /// Sets the new retries count
    pub fn retries(mut self, retries: i32) -> Self {
        self.request.retries = retries;
        self
    }

    /// The request that `send()` will issue
    pub fn request(&self) -> &UpdateJobRetriesRequest {
        &self.request
    }

    /// Sends the update to the gateway
    pub async fn send(self) -> Result<()> {
        self.client.ensure_open()?;
        validate_retries(self.request.retries)?;
        debug!(
            "Setting retries of job {} to {}",
            self.request.job_key, self.request.retries
        );
        self.client.gateway().update_job_retries(self.request).await
    }
}

fn validate_document(json: &str) -> Result<()> {
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(serde_json::Value::Object(_)) => Ok(()),
        Ok(_) => Err(ClientError::InvalidRequest(
            "variables must be a JSON object".to_string(),
        )),
        Err(e) => Err(ClientError::InvalidRequest(format!(
            "variables are not valid JSON: {}",
            e
        ))),
    }
}

fn validate_retries(retries: i32) -> Result<()> {
    if retries < 0 {
        return Err(ClientError::InvalidRequest(format!(
            "retries must not be negative, got {}",
            retries
        )));
    }
    Ok(())
}
