//! Error types for the Flowgate client

use std::fmt;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Classification of a failed gateway call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// The gateway could not be reached or is not serving
    Unavailable,
    /// The gateway is applying backpressure
    ResourceExhausted,
    /// The call did not finish in time
    DeadlineExceeded,
    /// The referenced job does not exist (or is no longer activated)
    NotFound,
    /// The gateway rejected the request contents
    InvalidArgument,
    /// Any other failure, including unexpected HTTP statuses
    Other,
}

impl StatusCode {
    /// Maps an HTTP status returned by the gateway onto a classification
    pub fn from_http(status: u16) -> Self {
        match status {
            503 => Self::Unavailable,
            429 => Self::ResourceExhausted,
            408 | 504 => Self::DeadlineExceeded,
            404 => Self::NotFound,
            400 => Self::InvalidArgument,
            _ => Self::Other,
        }
    }

    /// Whether a call failing with this status is worth repeating
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::Unavailable | Self::ResourceExhausted | Self::DeadlineExceeded
        )
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unavailable => "unavailable",
            Self::ResourceExhausted => "resource exhausted",
            Self::DeadlineExceeded => "deadline exceeded",
            Self::NotFound => "not found",
            Self::InvalidArgument => "invalid argument",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when using the Flowgate client
#[derive(Debug, Error)]
pub enum ClientError {
    /// A gateway call failed
    #[error("gateway call failed ({status}): {message}")]
    Transport {
        /// Classification of the failure
        status: StatusCode,
        /// Error message from the transport or the gateway
        message: String,
    },

    /// Failed to parse a gateway response
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The request was rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The client was disposed; no further calls may be issued
    #[error("client has been disposed")]
    Disposed,
}

impl ClientError {
    /// Create a transport error from a status and message
    pub fn transport(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// The transport status, if this error came from a gateway call
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if repeating the call could succeed
    pub fn is_transient(&self) -> bool {
        self.status().is_some_and(StatusCode::is_transient)
    }

    /// Check if this error signals use of a disposed client
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let status = if err.is_timeout() {
            StatusCode::DeadlineExceeded
        } else if err.is_connect() {
            StatusCode::Unavailable
        } else if let Some(code) = err.status() {
            StatusCode::from_http(code.as_u16())
        } else if err.is_decode() {
            return Self::Parse(err.to_string());
        } else {
            StatusCode::Other
        };
        Self::transport(status, err.to_string())
    }
}
