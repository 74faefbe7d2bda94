//! Job DTOs for gateway communication

use serde::{Deserialize, Serialize};

use crate::domain::job::{Job, JobKey};

/// Request to activate jobs of a given type for a worker
///
/// Built once when a worker is opened and reused unchanged for every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateJobsRequest {
    #[serde(rename = "type")]
    pub job_type: String,
    pub worker: String,
    /// Milliseconds the activated jobs stay locked to this worker
    pub timeout: i64,
    pub max_jobs_to_activate: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fetch_variable: Vec<String>,
    /// Milliseconds the gateway may hold the call open waiting for jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<i64>,
}

/// One batch of jobs delivered by an activation call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateJobsResponse {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Reports successful completion of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteJobRequest {
    pub job_key: JobKey,
    /// JSON document merged into the process instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<String>,
}

/// Reports a failed attempt at a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailJobRequest {
    pub job_key: JobKey,
    /// Retries left; zero raises an incident on the gateway
    pub retries: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Overwrites the remaining retries of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRetriesRequest {
    pub job_key: JobKey,
    pub retries: i32,
}
