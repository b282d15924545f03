//! Error types for the Cadence server client.

use cadence_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to the Cadence backend.
#[derive(Error, Debug)]
pub enum ServerClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ServerClientError {
    /// Classify a transport error
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::ServerUnreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

impl From<ServerClientError> for CoreError {
    fn from(e: ServerClientError) -> Self {
        match e {
            ServerClientError::NotFound(id) => CoreError::not_found("resource", id),
            ServerClientError::ParseError(msg) => CoreError::invalid_response(msg),
            ServerClientError::InvalidUrl(msg) => CoreError::invalid_input(msg),
            other => CoreError::unavailable(other.to_string()),
        }
    }
}

/// Result type for server client operations.
pub type Result<T> = std::result::Result<T, ServerClientError>;
