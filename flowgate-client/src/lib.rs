//! Flowgate Client
//!
//! A client for the workflow-engine gateway. It issues job commands and hands
//! workers the [`JobClient`] they pass to job handlers.
//!
//! The transport sits behind the [`Gateway`] trait; [`HttpGateway`] talks to
//! the gateway's REST endpoints.
//!
//! # Example
//!
//! ```no_run
//! use flowgate_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> flowgate_client::Result<()> {
//!     let client = Client::new("http://localhost:8080");
//!
//!     client
//!         .job_client()
//!         .new_complete_job_command(2251799813685249)
//!         .variables(r#"{"approved":true}"#)
//!         .send()
//!         .await?;
//!
//!     client.dispose();
//!     Ok(())
//! }
//! ```

mod commands;
pub mod error;
mod gateway;
mod http;
mod job_client;
pub mod retry;

// Re-export commonly used types
pub use commands::{CompleteJobCommand, FailJobCommand, UpdateRetriesCommand};
pub use error::{ClientError, Result, StatusCode};
pub use gateway::{ActivationStream, Gateway};
pub use http::HttpGateway;
pub use job_client::JobClient;
pub use retry::RetryPolicy;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Handle to a workflow-engine gateway
///
/// Clones share the connection and the disposal state. Once [`dispose`]d,
/// every command and every new worker fails with [`ClientError::Disposed`].
///
/// [`dispose`]: Client::dispose
#[derive(Debug, Clone)]
pub struct Client {
    job_client: JobClient,
    disposed: Arc<AtomicBool>,
}

impl Client {
    /// Create a client talking to the gateway's REST endpoints
    ///
    /// # Example
    /// ```
    /// use flowgate_client::Client;
    ///
    /// let client = Client::new("http://localhost:8080");
    /// assert!(!client.is_disposed());
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_gateway(Arc::new(HttpGateway::new(base_url)))
    }

    /// Create a client over any gateway transport
    pub fn with_gateway(gateway: Arc<dyn Gateway>) -> Self {
        let disposed = Arc::new(AtomicBool::new(false));
        Self {
            job_client: JobClient::new(gateway, Arc::clone(&disposed)),
            disposed,
        }
    }

    /// The facade for issuing job commands
    pub fn job_client(&self) -> JobClient {
        self.job_client.clone()
    }

    /// Disposes the client
    ///
    /// Idempotent. Commands already in flight are not interrupted.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            info!("Gateway client disposed");
        }
    }

    /// Check whether the client has been disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}
