//! Types for Cadence backend API requests and responses.

use cadence_core::{JobId, PlaybackSession, SessionId, Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for connecting to a Cadence backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "https://music.example.com")
    pub url: String,
    /// Bearer token sent with every request (if the server requires one)
    pub access_token: Option<String>,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Create a config with an access token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::new(url)
        }
    }
}

// =============================================================================
// Track Types
// =============================================================================

/// A track as returned by the server.
///
/// Everything except the id may be missing for files the scanner could not
/// fully tag.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerTrack {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub ai_genre: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub track_number: Option<i32>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub bitrate: Option<i32>,
}

impl From<ServerTrack> for Track {
    fn from(t: ServerTrack) -> Self {
        let title = t
            .title
            .or(t.filename)
            .unwrap_or_else(|| t.id.clone());

        Track {
            id: TrackId::new(t.id),
            title,
            artist: t.artist.unwrap_or_default(),
            album: t.album,
            duration: t
                .duration
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
            bitrate: t.bitrate.and_then(|b| u32::try_from(b).ok()),
            genre: t.genre,
            ai_genre: t.ai_genre,
            mood: t.mood,
            year: t.year.and_then(|y| u32::try_from(y).ok()),
            track_number: t.track_number.and_then(|n| u32::try_from(n).ok()),
        }
    }
}

// =============================================================================
// Session Types
// =============================================================================

/// Response from the playback session endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    #[serde(alias = "session_id")]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<SessionResponse> for PlaybackSession {
    fn from(r: SessionResponse) -> Self {
        let mut session = PlaybackSession::new(SessionId::new(r.id));
        if let Some(created_at) = r.created_at {
            session.created_at = created_at;
        }
        session
    }
}

// =============================================================================
// Smart Queue Types
// =============================================================================

/// Request body for creating a smart queue.
#[derive(Debug, Serialize)]
pub struct CreateSmartQueueRequest<'a> {
    pub name: &'a str,
    pub queue_type: &'a str,
}

/// A smart queue as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct SmartQueueResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub queue_type: Option<String>,
    #[serde(default)]
    pub track_ids: Vec<String>,
}

impl SmartQueueResponse {
    /// Job id for this queue
    pub fn job_id(&self) -> JobId {
        JobId::new(self.id.clone())
    }

    /// Generated track ids, in order
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.track_ids.iter().map(|id| TrackId::new(id.as_str())).collect()
    }
}
