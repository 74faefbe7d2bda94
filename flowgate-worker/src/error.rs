//! Error types for job workers

use flowgate_client::ClientError;
use thiserror::Error;

/// Result type alias for worker operations
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Reasons a worker refuses to open
#[derive(Debug, Error)]
pub enum WorkerError {
    /// No job type was configured
    #[error("job type must be set and non-empty")]
    MissingJobType,

    /// No handler was configured
    #[error("job handler must be set")]
    MissingHandler,

    /// A configuration value is out of range
    #[error("invalid worker configuration: {0}")]
    InvalidConfig(String),

    /// Workers spawn their loops on the current Tokio runtime
    #[error("a worker must be opened from within a Tokio runtime")]
    NoRuntime,

    /// The client the worker was built from is unusable
    #[error(transparent)]
    Client(#[from] ClientError),
}
