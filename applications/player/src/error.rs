/// Player error types
use cadence_playback::PlaybackError;
use cadence_server_client::ServerClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server client error: {0}")]
    Client(#[from] ServerClientError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),
}

impl From<config::ConfigError> for PlayerError {
    fn from(e: config::ConfigError) -> Self {
        PlayerError::Config(e.to_string())
    }
}
