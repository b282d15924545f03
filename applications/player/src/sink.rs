//! Clock-driven media sink
//!
//! Stands in for an audio device: "plays" a stream by advancing a position
//! on a tokio interval and notifies listeners the way a media element does.
//! Every source is reported with the configured default length.

use crate::config::SinkSettings;
use async_trait::async_trait;
use cadence_playback::{ListenerId, MediaSink, PlaybackError, SinkEvent};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

#[derive(Default)]
struct ClockState {
    source: Option<String>,
    position: Duration,
    duration: Option<Duration>,
    playing: bool,
    gain: f32,
    listeners: Vec<(ListenerId, UnboundedSender<SinkEvent>)>,
    next_listener: u64,
}

impl ClockState {
    fn notify(&mut self, event: SinkEvent) {
        // Drop listeners whose receiver is gone
        self.listeners.retain(|(_, tx)| tx.send(event).is_ok());
    }

    fn advance(&mut self, step: Duration) {
        if !self.playing {
            return;
        }
        let Some(duration) = self.duration else {
            return;
        };

        self.position = (self.position + step).min(duration);
        self.notify(SinkEvent::TimeUpdate(self.position));

        if self.position >= duration {
            self.playing = false;
            debug!(source = ?self.source, "Simulated stream ended");
            self.notify(SinkEvent::Ended);
        }
    }
}

/// Media sink backed by a simulated clock
///
/// Must be created inside a tokio runtime; the clock task stops once the
/// sink is dropped.
pub struct ClockSink {
    state: Arc<Mutex<ClockState>>,
    track_length: Duration,
}

impl ClockSink {
    pub fn new(settings: &SinkSettings) -> Self {
        let state = Arc::new(Mutex::new(ClockState::default()));
        let tick = Duration::from_millis(settings.tick_ms.max(1));
        let step = tick.mul_f64(settings.speed.max(0.0));

        tokio::spawn(run_clock(Arc::downgrade(&state), tick, step));

        Self {
            state,
            track_length: Duration::from_secs(settings.default_track_secs),
        }
    }

    /// Whether output is running
    pub fn is_playing(&self) -> bool {
        self.lock().playing
    }

    /// Stream currently set
    pub fn source(&self) -> Option<String> {
        self.lock().source.clone()
    }

    /// Output gain last applied
    pub fn gain(&self) -> f32 {
        self.lock().gain
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn run_clock(state: Weak<Mutex<ClockState>>, tick: Duration, step: Duration) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let Some(shared) = state.upgrade() else {
            break;
        };
        shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .advance(step);
    }
    trace!("Sink clock stopped");
}

#[async_trait]
impl MediaSink for ClockSink {
    fn set_source(&mut self, uri: &str) {
        debug!(uri = %uri, "Sink source set");
        let mut state = self.lock();
        state.source = Some(uri.to_string());
        state.playing = false;
    }

    fn load(&mut self) {
        let length = self.track_length;
        let mut state = self.lock();
        state.position = Duration::ZERO;
        state.duration = state.source.as_ref().map(|_| length);
        if let Some(duration) = state.duration {
            state.notify(SinkEvent::DurationKnown(duration));
        }
    }

    async fn play(&mut self) -> cadence_playback::Result<()> {
        let mut state = self.lock();
        if state.source.is_none() {
            return Err(PlaybackError::PlaybackStart("no source set".to_string()));
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.lock().playing = false;
    }

    fn current_time(&self) -> Duration {
        self.lock().position
    }

    fn set_current_time(&mut self, position: Duration) {
        let mut state = self.lock();
        state.position = match state.duration {
            Some(duration) => position.min(duration),
            None => position,
        };
        let position = state.position;
        state.notify(SinkEvent::TimeUpdate(position));
    }

    fn duration(&self) -> Option<Duration> {
        self.lock().duration
    }

    fn set_volume(&mut self, gain: f32) {
        self.lock().gain = gain.clamp(0.0, 1.0);
    }

    fn subscribe(&mut self, listener: UnboundedSender<SinkEvent>) -> ListenerId {
        let mut state = self.lock();
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.lock().listeners.retain(|(listener, _)| *listener != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn settings(track_secs: u64) -> SinkSettings {
        SinkSettings {
            tick_ms: 100,
            default_track_secs: track_secs,
            speed: 1.0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn plays_to_the_end() {
        let mut sink = ClockSink::new(&settings(1));
        let (tx, mut rx) = mpsc::unbounded_channel();
        sink.subscribe(tx);

        sink.set_source("http://localhost/api/tracks/t-1/stream");
        sink.load();
        sink.play().await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(SinkEvent::DurationKnown(Duration::from_secs(1)))
        );

        let mut last = None;
        while let Some(event) = rx.recv().await {
            if event == SinkEvent::Ended {
                break;
            }
            last = Some(event);
        }

        assert_eq!(last, Some(SinkEvent::TimeUpdate(Duration::from_secs(1))));
        assert_eq!(sink.current_time(), Duration::from_secs(1));
        assert!(!sink.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn play_without_source_is_refused() {
        let mut sink = ClockSink::new(&settings(1));
        let result = sink.play().await;
        assert!(matches!(result, Err(PlaybackError::PlaybackStart(_))));
        assert!(!sink.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_position() {
        let mut sink = ClockSink::new(&settings(60));
        sink.set_source("stream://a");
        sink.load();
        sink.play().await.unwrap();

        tokio::time::sleep(Duration::from_millis(550)).await;
        sink.pause();
        let paused_at = sink.current_time();
        assert!(paused_at > Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(sink.current_time(), paused_at);
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribed_listener_gets_nothing() {
        let mut sink = ClockSink::new(&settings(1));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = sink.subscribe(tx);
        sink.unsubscribe(id);

        sink.set_source("stream://a");
        sink.load();
        sink.set_current_time(Duration::from_millis(500));

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn seek_is_clamped_and_volume_is_clamped() {
        let mut sink = ClockSink::new(&settings(10));
        sink.set_source("stream://a");
        sink.load();

        sink.set_current_time(Duration::from_secs(99));
        assert_eq!(sink.current_time(), Duration::from_secs(10));

        sink.set_volume(1.5);
        assert_eq!(sink.gain(), 1.0);
        assert_eq!(sink.source().as_deref(), Some("stream://a"));
    }
}
