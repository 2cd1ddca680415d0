//! Node-level error types.

use thiserror::Error;

/// The single classified error a node surfaces to its host.
///
/// Nothing is retried or recovered locally: the host decides how to present
/// the failure and whether the surrounding workflow continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The `resource` parameter is not one the node knows about.
    #[error("Unsupported resource: '{0}'")]
    UnsupportedResource(String),

    /// The `operation` parameter is not one the node knows about.
    #[error("Unsupported operation: '{0}'")]
    UnsupportedOperation(String),

    /// Credentials could not be resolved or are incomplete.
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// The upstream call failed; carries the original message verbatim.
    #[error("{0}")]
    Upstream(String),

    /// The upstream call failed without any extractable message.
    #[error("Unknown error")]
    Unknown,
}

/// Failure reported by an [`HttpClient`](crate::http::HttpClient) capability.
///
/// Hosts are free to hand back errors without a message (a bare rejection);
/// those become [`NodeError::Unknown`].
#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{}", .message.as_deref().unwrap_or("unknown error"))]
pub struct HttpError {
    pub message: Option<String>,
    /// HTTP status, when the failure came from a non-2xx response.
    pub status: Option<u16>,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            status: Some(status),
        }
    }

    /// An error with nothing to say about itself.
    pub fn opaque() -> Self {
        Self::default()
    }
}

impl From<HttpError> for NodeError {
    fn from(err: HttpError) -> Self {
        match err.message {
            Some(message) if !message.trim().is_empty() => Self::Upstream(message),
            _ => Self::Unknown,
        }
    }
}
