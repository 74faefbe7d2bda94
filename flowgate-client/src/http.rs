//! HTTP/JSON gateway transport

use async_trait::async_trait;
use flowgate_core::dto::job::{
    ActivateJobsRequest, ActivateJobsResponse, CompleteJobRequest, FailJobRequest,
    UpdateJobRetriesRequest,
};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, Result, StatusCode};
use crate::gateway::{ActivationStream, Gateway};

/// Gateway reached over its REST endpoints
///
/// An activation call answers with a single batch, exposed as a one-item
/// stream.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    /// Base URL of the gateway (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl HttpGateway {
    /// Create a gateway transport for the given base URL
    ///
    /// # Example
    /// ```
    /// use flowgate_client::HttpGateway;
    ///
    /// let gateway = HttpGateway::new("http://localhost:8080/");
    /// assert_eq!(gateway.base_url(), "http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a gateway transport with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the gateway
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse JSON response: {}", e)))
    }

    /// Check the status code of a response without a body
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::transport(
                StatusCode::from_http(status.as_u16()),
                format!("{}: {}", status, error_text),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn activate_jobs(&self, request: ActivateJobsRequest) -> Result<ActivationStream> {
        let response = self.post("/v1/jobs/activation", &request).await?;
        let batch: ActivateJobsResponse = self.handle_response(response).await?;

        Ok(stream::once(async move { Ok(batch) }).boxed())
    }

    async fn complete_job(&self, request: CompleteJobRequest) -> Result<()> {
        let path = format!("/v1/jobs/{}/completion", request.job_key);
        let response = self.post(&path, &request).await?;

        self.handle_empty_response(response).await
    }

    async fn fail_job(&self, request: FailJobRequest) -> Result<()> {
        let path = format!("/v1/jobs/{}/failure", request.job_key);
        let response = self.post(&path, &request).await?;

        self.handle_empty_response(response).await
    }

    async fn update_job_retries(&self, request: UpdateJobRetriesRequest) -> Result<()> {
        let url = format!("{}/v1/jobs/{}", self.base_url, request.job_key);
        debug!("PATCH {}", url);
        let response = self.client.patch(&url).json(&request).send().await?;

        self.handle_empty_response(response).await
    }
}
