/// Playback session handle
use crate::types::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session handle returned by the backend when the player starts
///
/// Created once per process and kept for its whole lifetime. The backend uses
/// it to correlate skip and generation requests; without one, auto-queue
/// continuation is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSession {
    /// Session identifier
    pub id: SessionId,

    /// When the backend created the session
    pub created_at: DateTime<Utc>,
}

impl PlaybackSession {
    /// Create a session handle stamped with the current time
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
        }
    }
}
