//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are queued by the
//! engine as it changes state and drained by whoever drives it:
//! - State changes (play/pause/halt)
//! - Track changes, tagged with the queue the track came from
//! - Queue changes, including auto-queue installs and discarded results
//! - Position and duration updates from the sink
//! - Notices for failures the listener should see

use crate::types::{PlaybackMode, PlaybackState, QueueKind};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track (or the same track again) was loaded
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
        /// Queue the track came from (None for a one-off play)
        kind: Option<QueueKind>,
        /// Index within that queue
        index: Option<usize>,
    },

    /// Position update from the sink
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration, 0 while unknown
        duration_ms: u64,
    },

    /// The sink learned the duration of the loaded track
    DurationKnown {
        /// Total track duration
        duration_ms: u64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// A queue's contents were replaced or extended
    QueueChanged {
        /// Which queue changed
        kind: QueueKind,
        /// New length
        length: usize,
    },

    /// A background generation result was installed as the auto queue
    AutoQueueInstalled {
        /// Number of tracks installed
        length: usize,
    },

    /// A background generation result arrived after it was superseded
    AutoQueueDiscarded,

    /// Shuffle, repeat or unlimited mode changed
    ModeChanged {
        /// New shuffle/repeat settings
        mode: PlaybackMode,
        /// Whether unlimited continuation is on
        unlimited: bool,
    },

    /// Something failed that the listener should know about
    Error {
        /// Human-readable message
        message: String,
    },
}

impl PlaybackEvent {
    /// Create a notice event
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
