/// Core error types for Cadence
use thiserror::Error;
use crate::types::TrackId;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Cadence
///
/// Collaborator implementations map their transport errors into this type so
/// the playback engine can log and degrade without knowing the transport.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Track not found
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Collaborator is unreachable or returned an error
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    /// Collaborator answered with something we could not understand
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error means the entity does not exist (as opposed to a
    /// failed request)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::TrackNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_detected() {
        assert!(CoreError::not_found("Track", "t-1").is_not_found());
        assert!(CoreError::TrackNotFound(TrackId::new("t-1")).is_not_found());
        assert!(!CoreError::unavailable("connection refused").is_not_found());
    }

    #[test]
    fn display_includes_context() {
        let err = CoreError::not_found("Job", "j-9");
        assert_eq!(err.to_string(), "Job not found: j-9");
    }
}
