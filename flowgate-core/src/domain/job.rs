//! Job domain types

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique numeric identifier of a job assigned by the gateway
pub type JobKey = i64;

/// A unit of work activated for a worker
///
/// Produced by the gateway in response to an activation request. `variables`
/// and `custom_headers` are JSON documents encoded as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub key: JobKey,
    #[serde(rename = "type")]
    pub job_type: String,
    pub process_instance_key: i64,
    pub bpmn_process_id: String,
    pub process_definition_version: i32,
    pub process_definition_key: i64,
    pub element_id: String,
    pub element_instance_key: i64,
    #[serde(default = "empty_document")]
    pub custom_headers: String,
    pub worker: String,
    pub retries: i32,
    /// Epoch milliseconds after which the gateway may hand the job to another worker
    pub deadline: i64,
    #[serde(default = "empty_document")]
    pub variables: String,
}

fn empty_document() -> String {
    "{}".to_string()
}

impl Job {
    /// Deserializes the job variables into a caller-defined type
    pub fn variables_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.variables)
    }

    /// Parses the custom headers defined on the task during modelling
    pub fn custom_headers_map(&self) -> serde_json::Result<HashMap<String, String>> {
        serde_json::from_str(&self.custom_headers)
    }

    /// The activation deadline as a UTC timestamp
    ///
    /// Returns `None` if the gateway sent a value outside chrono's range.
    pub fn deadline_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.deadline)
    }
}
