/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Audio track as known to the catalog
///
/// Immutable value owned by the catalog service; the playback engine only
/// holds copies. Every field the catalog may not know is an explicit
/// `Option` rather than a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: Option<String>,

    /// Track duration (unknown until the catalog or the sink reports it)
    pub duration: Option<Duration>,

    /// Bitrate in kbps
    pub bitrate: Option<u32>,

    /// Genre from file tags
    pub genre: Option<String>,

    /// Genre assigned by audio analysis
    pub ai_genre: Option<String>,

    /// Mood assigned by audio analysis
    pub mood: Option<String>,

    /// Release year
    pub year: Option<u32>,

    /// Track number
    pub track_number: Option<u32>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: TrackId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration: None,
            bitrate: None,
            genre: None,
            ai_genre: None,
            mood: None,
            year: None,
            track_number: None,
        }
    }

    /// Set the album name
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Set the known duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the classification tags
    pub fn with_tags(mut self, genre: Option<String>, mood: Option<String>) -> Self {
        self.genre = genre;
        self.mood = mood;
        self
    }

    /// Album name for display
    pub fn display_album(&self) -> &str {
        self.album.as_deref().unwrap_or(UNKNOWN_ALBUM)
    }

    /// Artist name for display
    pub fn display_artist(&self) -> &str {
        if self.artist.is_empty() {
            UNKNOWN_ARTIST
        } else {
            &self.artist
        }
    }

    /// Best genre label: analysis result first, then file tags
    pub fn display_genre(&self) -> Option<&str> {
        self.ai_genre.as_deref().or(self.genre.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_creation() {
        let track = Track::new(TrackId::new("t1"), "Test Song", "Test Artist");
        assert_eq!(track.title, "Test Song");
        assert!(track.duration.is_none());
        assert_eq!(track.display_album(), "Unknown Album");
    }

    #[test]
    fn builder_sets_known_fields() {
        let track = Track::new(TrackId::new("t1"), "Song", "")
            .with_album("Album")
            .with_duration(Duration::from_secs(180))
            .with_tags(Some("jazz".into()), Some("calm".into()));

        assert_eq!(track.duration, Some(Duration::from_secs(180)));
        assert_eq!(track.display_artist(), "Unknown Artist");
        assert_eq!(track.display_genre(), Some("jazz"));
        assert_eq!(track.mood.as_deref(), Some("calm"));
    }

    #[test]
    fn ai_genre_wins_over_tag_genre() {
        let mut track = Track::new(TrackId::new("t1"), "Song", "Artist")
            .with_tags(Some("rock".into()), None);
        track.ai_genre = Some("indie rock".into());
        assert_eq!(track.display_genre(), Some("indie rock"));
    }
}
