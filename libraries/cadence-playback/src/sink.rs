//! Platform-agnostic media sink trait
//!
//! The engine never decodes audio itself. It hands a stream URI to a sink
//! (a browser media element, a native player, a simulated clock in tests)
//! and listens for the sink's progress notifications.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Notification pushed by a sink to its listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    /// Playback position moved
    TimeUpdate(Duration),

    /// Duration of the loaded media became known
    DurationKnown(Duration),

    /// Media played to the end
    Ended,
}

/// Handle returned by [`MediaSink::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Output device for a single stream at a time
///
/// Implementors own the actual playback. `play` is the only fallible call:
/// environments may refuse to start output (autoplay policies, a missing
/// device), and the engine must stay resumable when they do.
#[async_trait]
pub trait MediaSink: Send {
    /// Point the sink at a new stream
    fn set_source(&mut self, uri: &str);

    /// Prepare the current source; resets position to zero
    fn load(&mut self);

    /// Start or resume output
    ///
    /// # Returns
    /// * `Ok(())` - Output started
    /// * `Err(PlaybackError::PlaybackStart)` - The sink refused to start
    async fn play(&mut self) -> Result<()>;

    /// Pause output, keeping the position
    fn pause(&mut self);

    /// Current playback position
    fn current_time(&self) -> Duration;

    /// Jump to a position
    fn set_current_time(&mut self, position: Duration);

    /// Duration of the loaded media, once known
    fn duration(&self) -> Option<Duration>;

    /// Output gain in `[0.0, 1.0]`
    fn set_volume(&mut self, gain: f32);

    /// Register a listener for progress notifications
    fn subscribe(&mut self, listener: UnboundedSender<SinkEvent>) -> ListenerId;

    /// Remove a listener; unknown ids are ignored
    fn unsubscribe(&mut self, id: ListenerId);
}
