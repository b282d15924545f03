//! Shared fakes for engine and service tests
//!
//! `FakeBackend` implements every collaborator trait in memory.
//! `FakeSink` records what the engine asks of it; tests observe and script it
//! through a `SinkMonitor` that stays valid after the sink moves into the engine.

#![allow(dead_code)]

use async_trait::async_trait;
use cadence_core::{
    AnalyticsService, CatalogService, CoreError, JobId, PlaybackSession, PlaylistId,
    RecommendationService, SessionId, SessionService, Track, TrackId,
};
use cadence_playback::{
    Collaborators, ListenerId, MediaSink, PlaybackConfig, PlaybackEngine, PlaybackError,
    SinkEvent,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Notify;

// ===== Tracks =====

/// Track with a known duration
pub fn track(id: &str) -> Track {
    Track::new(TrackId::new(id), format!("Track {}", id), "Test Artist")
        .with_duration(Duration::from_secs(180))
}

/// Track whose duration is unknown
pub fn bare_track(id: &str) -> Track {
    Track::new(TrackId::new(id), format!("Track {}", id), "Test Artist")
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

pub fn ids(ids: &[&str]) -> Vec<TrackId> {
    ids.iter().map(|id| TrackId::new(*id)).collect()
}

// ===== Backend =====

/// In-memory backend implementing every collaborator
#[derive(Default)]
pub struct FakeBackend {
    library: HashMap<TrackId, Track>,
    /// Results handed out by successive generations
    generations: Mutex<VecDeque<Vec<TrackId>>>,
    /// Result once `generations` is exhausted
    default_generation: Mutex<Vec<TrackId>>,
    pub fail_session: bool,
    pub jobs_created: AtomicUsize,
    pub seeds: Mutex<Vec<TrackId>>,
    pub skips: Mutex<Vec<TrackId>>,
    pub playlist_plays: Mutex<Vec<PlaylistId>>,
}

impl FakeBackend {
    /// Backend whose catalog knows `ids`
    pub fn with_library(ids: &[&str]) -> Self {
        Self {
            library: ids
                .iter()
                .map(|id| (TrackId::new(*id), track(id)))
                .collect(),
            ..Self::default()
        }
    }

    /// Every generation returns `ids` unless a scripted result is queued
    pub fn auto_queue(self, track_ids: &[&str]) -> Self {
        *self.default_generation.lock().unwrap() = ids(track_ids);
        self
    }

    /// Queue the result of the next generation
    pub fn then_generate(self, track_ids: &[&str]) -> Self {
        self.generations.lock().unwrap().push_back(ids(track_ids));
        self
    }

    pub fn without_session(mut self) -> Self {
        self.fail_session = true;
        self
    }

    pub fn skipped(&self) -> Vec<String> {
        self.skips
            .lock()
            .unwrap()
            .iter()
            .map(|id| id.to_string())
            .collect()
    }
}

#[async_trait]
impl CatalogService for FakeBackend {
    async fn resolve_track(&self, id: &TrackId) -> cadence_core::Result<Option<Track>> {
        Ok(self.library.get(id).cloned())
    }

    fn stream_url(&self, id: &TrackId) -> String {
        format!("mem://tracks/{}", id)
    }
}

#[async_trait]
impl SessionService for FakeBackend {
    async fn create_session(&self) -> cadence_core::Result<PlaybackSession> {
        if self.fail_session {
            return Err(CoreError::unavailable("session service down"));
        }
        Ok(PlaybackSession::new(SessionId::new("session-1")))
    }
}

#[async_trait]
impl RecommendationService for FakeBackend {
    async fn create_auto_queue_job(&self, _name: &str) -> cadence_core::Result<JobId> {
        let n = self.jobs_created.fetch_add(1, Ordering::SeqCst);
        Ok(JobId::new(format!("job-{}", n)))
    }

    async fn run_auto_generation(
        &self,
        _job: &JobId,
        seed: &TrackId,
        _size: usize,
    ) -> cadence_core::Result<()> {
        self.seeds.lock().unwrap().push(seed.clone());
        Ok(())
    }

    async fn fetch_generated_queue(&self, _job: &JobId) -> cadence_core::Result<Vec<TrackId>> {
        let scripted = self.generations.lock().unwrap().pop_front();
        Ok(scripted.unwrap_or_else(|| self.default_generation.lock().unwrap().clone()))
    }
}

#[async_trait]
impl AnalyticsService for FakeBackend {
    async fn report_skip(&self, id: &TrackId) -> cadence_core::Result<()> {
        self.skips.lock().unwrap().push(id.clone());
        Ok(())
    }

    async fn report_play(&self, playlist: &PlaylistId) -> cadence_core::Result<()> {
        self.playlist_plays.lock().unwrap().push(playlist.clone());
        Ok(())
    }
}

// ===== Sink =====

#[derive(Default)]
struct SinkShared {
    source: Option<String>,
    loads: usize,
    playing: bool,
    fail_play: bool,
    play_gate: Option<Arc<Notify>>,
    position: Duration,
    duration: Option<Duration>,
    gain: f32,
    seeks: Vec<Duration>,
    listeners: HashMap<u64, UnboundedSender<SinkEvent>>,
    next_listener: u64,
}

/// Scripted media sink
pub struct FakeSink {
    shared: Arc<Mutex<SinkShared>>,
}

/// Test-side view of a `FakeSink`
#[derive(Clone)]
pub struct SinkMonitor {
    shared: Arc<Mutex<SinkShared>>,
}

impl FakeSink {
    pub fn new() -> (Self, SinkMonitor) {
        let shared = Arc::new(Mutex::new(SinkShared::default()));
        (
            Self {
                shared: shared.clone(),
            },
            SinkMonitor { shared },
        )
    }
}

#[async_trait]
impl MediaSink for FakeSink {
    fn set_source(&mut self, uri: &str) {
        self.shared.lock().unwrap().source = Some(uri.to_string());
    }

    fn load(&mut self) {
        let mut shared = self.shared.lock().unwrap();
        shared.loads += 1;
        shared.playing = false;
        shared.position = Duration::ZERO;
    }

    async fn play(&mut self) -> cadence_playback::Result<()> {
        let gate = self.shared.lock().unwrap().play_gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut shared = self.shared.lock().unwrap();
        if shared.fail_play {
            return Err(PlaybackError::PlaybackStart("play() rejected".to_string()));
        }
        shared.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.shared.lock().unwrap().playing = false;
    }

    fn current_time(&self) -> Duration {
        self.shared.lock().unwrap().position
    }

    fn set_current_time(&mut self, position: Duration) {
        let mut shared = self.shared.lock().unwrap();
        shared.position = position;
        shared.seeks.push(position);
    }

    fn duration(&self) -> Option<Duration> {
        self.shared.lock().unwrap().duration
    }

    fn set_volume(&mut self, gain: f32) {
        self.shared.lock().unwrap().gain = gain;
    }

    fn subscribe(&mut self, listener: UnboundedSender<SinkEvent>) -> ListenerId {
        let mut shared = self.shared.lock().unwrap();
        let id = shared.next_listener;
        shared.next_listener += 1;
        shared.listeners.insert(id, listener);
        ListenerId(id)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.shared.lock().unwrap().listeners.remove(&id.0);
    }
}

impl SinkMonitor {
    pub fn source(&self) -> Option<String> {
        self.shared.lock().unwrap().source.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.shared.lock().unwrap().playing
    }

    pub fn set_fail_play(&self, fail: bool) {
        self.shared.lock().unwrap().fail_play = fail;
    }

    /// Make every `play()` wait for a permit from the returned gate
    pub fn gate_play(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.shared.lock().unwrap().play_gate = Some(gate.clone());
        gate
    }

    pub fn set_position(&self, position: Duration) {
        self.shared.lock().unwrap().position = position;
    }

    pub fn set_duration(&self, duration: Option<Duration>) {
        self.shared.lock().unwrap().duration = duration;
    }

    pub fn gain(&self) -> f32 {
        self.shared.lock().unwrap().gain
    }

    pub fn seeks(&self) -> Vec<Duration> {
        self.shared.lock().unwrap().seeks.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.shared.lock().unwrap().listeners.len()
    }

    /// Push an event to every listener
    pub fn emit(&self, event: SinkEvent) {
        for listener in self.shared.lock().unwrap().listeners.values() {
            let _ = listener.send(event);
        }
    }
}

// ===== Engine =====

pub fn engine_with(
    backend: Arc<FakeBackend>,
    config: PlaybackConfig,
) -> (PlaybackEngine<FakeSink>, SinkMonitor) {
    let (sink, monitor) = FakeSink::new();
    let engine = PlaybackEngine::new(config, sink, Collaborators::from_backend(backend));
    (engine, monitor)
}

pub fn engine(backend: Arc<FakeBackend>) -> (PlaybackEngine<FakeSink>, SinkMonitor) {
    engine_with(backend, PlaybackConfig::default())
}

/// Id of the loaded track
pub fn current_id(engine: &PlaybackEngine<FakeSink>) -> Option<String> {
    engine.current_track().map(|t| t.id.to_string())
}
