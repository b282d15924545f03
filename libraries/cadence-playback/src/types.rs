//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Which of the two queues a position refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    /// Tracks the listener picked (library view, playlist, smart mix)
    User,

    /// Tracks the recommendation service generated to continue playback
    Auto,
}

/// Position of the currently loaded track
///
/// Only exists while a track is loaded from a queue; `index` is always in
/// bounds of the queue named by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCursor {
    /// Active queue
    pub kind: QueueKind,

    /// Index into the active queue
    pub index: usize,
}

impl QueueCursor {
    /// Create a cursor
    pub fn new(kind: QueueKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Idle,

    /// Track set, sink not (yet) producing output
    Loaded,

    /// Currently playing
    Playing,

    /// Paused mid-track, or halted at the end of the queue
    Paused,

    /// Track finished; a transition decision is being made
    Ended,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[serde(rename = "none")]
    Off,

    /// Loop current track only
    Track,

    /// Loop the active queue
    Queue,
}

impl RepeatMode {
    /// Next mode in the toggle order: off, track, queue, off
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::Track,
            RepeatMode::Track => RepeatMode::Queue,
            RepeatMode::Queue => RepeatMode::Off,
        }
    }
}

/// Shuffle and repeat settings
///
/// Orthogonal to the queue kind; survives track changes until toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackMode {
    /// Pick the next index at random
    pub shuffle: bool,

    /// Repeat behavior at the end of a track or queue
    pub repeat: RepeatMode,
}

impl Default for PlaybackMode {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// Auto-queue generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoQueueConfig {
    /// Number of tracks asked for on each generation (default: 50)
    pub size: usize,

    /// Upper bound the backend accepts for one request (default: 50)
    pub max_request: usize,

    /// Number of generated ids resolved into tracks (default: 20)
    pub resolve_limit: usize,

    /// Name given to server-side generation jobs
    pub job_name: String,
}

impl Default for AutoQueueConfig {
    fn default() -> Self {
        Self {
            size: 50,
            max_request: 50,
            resolve_limit: 20,
            job_name: "Auto Queue".to_string(),
        }
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial volume (0-100, default: 80)
    pub volume: u8,

    /// Initial shuffle state (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Continue into generated tracks when the user queue runs out (default: true)
    pub unlimited: bool,

    /// Auto-queue generation settings
    pub auto_queue: AutoQueueConfig,
}

impl PlaybackConfig {
    /// Shuffle/repeat settings this config starts with
    pub fn mode(&self) -> PlaybackMode {
        PlaybackMode {
            shuffle: self.shuffle,
            repeat: self.repeat,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 80,
            shuffle: false,
            repeat: RepeatMode::Off,
            unlimited: true,
            auto_queue: AutoQueueConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.volume, 80);
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert!(config.unlimited);
        assert_eq!(config.auto_queue.size, 50);
        assert_eq!(config.auto_queue.resolve_limit, 20);
    }

    #[test]
    fn repeat_cycles_through_all_modes() {
        let mut mode = RepeatMode::Off;
        let mut seen = vec![mode];
        for _ in 0..3 {
            mode = mode.cycle();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                RepeatMode::Off,
                RepeatMode::Track,
                RepeatMode::Queue,
                RepeatMode::Off
            ]
        );
    }

    #[test]
    fn repeat_uses_backend_names() {
        assert_eq!(serde_json::to_string(&RepeatMode::Off).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&RepeatMode::Queue).unwrap(), "\"queue\"");
        assert_eq!(serde_json::to_string(&QueueKind::Auto).unwrap(), "\"auto\"");
    }
}
