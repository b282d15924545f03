//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// None of these are fatal: the engine logs them, reports a notice when the
/// listener should know, and stays in a resumable state.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// The media sink refused to start output
    #[error("Playback could not start: {0}")]
    PlaybackStart(String),

    /// A track transition is already running
    #[error("A track transition is already in progress")]
    TransitionInProgress,

    /// The engine service is gone
    #[error("Playback service stopped")]
    ServiceStopped,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
