//! Cadence - Playback Engine
//!
//! Dual-queue playback management for Cadence.
//!
//! This crate provides:
//! - Two queues: the user queue (picked by the listener) and the auto queue
//!   (generated by the recommendation backend)
//! - Unlimited mode: continue into generated tracks when the user queue runs
//!   out, and regenerate when the auto queue runs out
//! - Shuffle and repeat modes (Off, Track, Queue)
//! - Volume control (0-100%, mute/unmute)
//! - Stale-result protection for background auto-queue generation
//! - A task-based service with command and event channels
//!
//! # Architecture
//!
//! `cadence-playback` never decodes audio and never talks HTTP itself:
//! - Output goes through the [`MediaSink`] trait
//! - Tracks, sessions, recommendations and analytics go through the
//!   collaborator traits in `cadence-core`
//!
//! # Example: Queue Transitions
//!
//! ```rust
//! use cadence_core::{Track, TrackId};
//! use cadence_playback::{NextAction, PlaybackMode, QueueKind, QueueState};
//!
//! let track = |id: &str| Track::new(TrackId::new(id), id, "Artist");
//!
//! let mut queues = QueueState::new();
//! queues.replace_queue(QueueKind::Auto, vec![track("d"), track("e")]);
//! queues.adopt_queue(QueueKind::User, vec![track("a"), track("b")], Some(&TrackId::new("b")));
//!
//! // End of the user queue in unlimited mode continues into the auto queue
//! let action = queues.compute_next(PlaybackMode::default(), true);
//! assert_eq!(action, NextAction::SwitchToAuto);
//!
//! let next = queues.apply_next(action).unwrap();
//! assert_eq!(next.id.as_str(), "d");
//! ```

pub mod autoqueue;
pub mod engine;
mod error;
pub mod events;
pub mod queue;
mod resolver;
pub mod service;
mod shuffle;
pub mod sink;
pub mod types;
mod volume;

// Public exports
pub use autoqueue::{AutoQueueCompletion, AutoQueueGenerator, GenerationToken};
pub use engine::{Collaborators, PlaybackEngine, PlaybackSnapshot};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use queue::{NextAction, PrevAction, Queue, QueueState};
pub use resolver::TrackResolver;
pub use service::{PlaybackCommand, PlaybackHandle, PlaybackService};
pub use sink::{ListenerId, MediaSink, SinkEvent};
pub use types::{
    AutoQueueConfig, PlaybackConfig, PlaybackMode, PlaybackState, QueueCursor, QueueKind,
    RepeatMode,
};
pub use volume::Volume;
