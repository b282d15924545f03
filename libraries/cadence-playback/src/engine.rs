//! Playback engine - core orchestration
//!
//! Coordinates the dual queue, transport state, volume, the media sink and
//! background auto-queue generation. The engine is a single owned object:
//! every operation takes `&mut self`, and state changes are reported through
//! a pending event list drained by the driver (see `service`).

use crate::{
    autoqueue::{AutoQueueCompletion, AutoQueueGenerator, GenerationToken},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    queue::{NextAction, PrevAction, QueueState},
    resolver::TrackResolver,
    sink::{MediaSink, SinkEvent},
    types::{PlaybackConfig, PlaybackMode, PlaybackState, QueueCursor, QueueKind, RepeatMode},
    volume::Volume,
};
use cadence_core::{
    AnalyticsService, CatalogService, PlaybackSession, PlaylistId, RecommendationService,
    SessionService, Track, TrackId,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Backend services the engine talks to
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn CatalogService>,
    pub sessions: Arc<dyn SessionService>,
    pub recommendations: Arc<dyn RecommendationService>,
    pub analytics: Arc<dyn AnalyticsService>,
}

impl Collaborators {
    /// Use one backend for every collaborator role
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: CatalogService + SessionService + RecommendationService + AnalyticsService + 'static,
    {
        Self {
            catalog: backend.clone(),
            sessions: backend.clone(),
            recommendations: backend.clone(),
            analytics: backend,
        }
    }
}

/// Point-in-time copy of the engine state, for UIs
#[derive(Debug, Clone)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub current_track: Option<Track>,
    pub cursor: Option<QueueCursor>,
    pub user_queue: Vec<Track>,
    pub auto_queue: Vec<Track>,
    pub mode: PlaybackMode,
    pub unlimited: bool,
    pub volume: u8,
    pub muted: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
}

impl PlaybackSnapshot {
    /// Whether row `index` of queue `kind` is the loaded track
    pub fn is_current(&self, kind: QueueKind, index: usize) -> bool {
        self.cursor == Some(QueueCursor::new(kind, index))
    }
}

/// Dual-queue playback engine
pub struct PlaybackEngine<S: MediaSink> {
    sink: S,

    // Queues and cursor
    queues: QueueState,

    // Transport
    state: PlaybackState,
    current_track: Option<Track>,
    position: Duration,
    duration: Option<Duration>,

    // Modes
    mode: PlaybackMode,
    unlimited: bool,
    volume: Volume,

    // Collaborators
    resolver: TrackResolver,
    generator: AutoQueueGenerator,
    sessions: Arc<dyn SessionService>,
    analytics: Arc<dyn AnalyticsService>,
    session: Option<PlaybackSession>,

    // Background auto-queue generation
    generation: GenerationToken,
    completions_tx: UnboundedSender<AutoQueueCompletion>,
    completions_rx: UnboundedReceiver<AutoQueueCompletion>,
    pending_generations: usize,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<S: MediaSink> PlaybackEngine<S> {
    /// Create a new engine driving `sink`
    pub fn new(config: PlaybackConfig, mut sink: S, collaborators: Collaborators) -> Self {
        let resolver = TrackResolver::new(collaborators.catalog);
        let generator = AutoQueueGenerator::new(
            collaborators.recommendations,
            resolver.clone(),
            config.auto_queue.clone(),
        );
        let volume = Volume::new(config.volume);
        sink.set_volume(volume.gain());
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            mode: config.mode(),
            unlimited: config.unlimited,
            sink,
            queues: QueueState::new(),
            state: PlaybackState::Idle,
            current_track: None,
            position: Duration::ZERO,
            duration: None,
            volume,
            resolver,
            generator,
            sessions: collaborators.sessions,
            analytics: collaborators.analytics,
            session: None,
            generation: GenerationToken::default(),
            completions_tx,
            completions_rx,
            pending_generations: 0,
            pending_events: Vec::new(),
        }
    }

    // ===== Session =====

    /// Create the playback session
    ///
    /// Called once at startup. On failure the engine keeps running with
    /// auto-queue generation disabled.
    pub async fn start_session(&mut self) -> bool {
        match self.sessions.create_session().await {
            Ok(session) => {
                info!(session_id = %session.id, "Playback session created");
                self.session = Some(session);
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to create playback session, auto queue disabled");
                false
            }
        }
    }

    /// Current playback session, if one was created
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    // ===== Playback Control =====

    /// Load `track` and start it
    ///
    /// When `queue` is given it replaces the queue of `kind` and becomes
    /// active, focused on `track`. Otherwise the cursor moves to `track` if
    /// the queue of `kind` already contains it. Playing from the user queue
    /// in unlimited mode also requests a fresh auto queue seeded on `track`.
    pub async fn play(
        &mut self,
        track: Track,
        queue: Option<Vec<Track>>,
        kind: QueueKind,
    ) -> Result<()> {
        match queue {
            Some(tracks) => {
                self.queues.adopt_queue(kind, tracks, Some(&track.id));
                self.emit_queue_changed(kind);
            }
            None => match self.queues.queue(kind).position_of(&track.id) {
                Some(index) => {
                    self.queues.move_to(kind, index);
                }
                None => self.queues.detach(),
            },
        }

        self.enter_track(track, kind, true).await
    }

    /// Start output of the loaded track
    ///
    /// A refused start leaves the state unchanged and emits an error event.
    pub async fn start(&mut self) -> Result<()> {
        if self.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        match self.sink.play().await {
            Ok(()) => {
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, state = ?self.state, "Media sink refused to start");
                self.emit_event(PlaybackEvent::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.sink.pause();
            self.position = self.sink.current_time();
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Resume playback
    ///
    /// No-op unless paused or loaded.
    pub async fn resume(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Paused | PlaybackState::Loaded => self.start().await,
            _ => Ok(()),
        }
    }

    /// Pause when playing, otherwise resume
    pub async fn toggle_play_pause(&mut self) -> Result<()> {
        if self.state == PlaybackState::Playing {
            self.pause();
            Ok(())
        } else {
            self.resume().await
        }
    }

    /// Seek to a fraction of the track (0.0 - 1.0)
    ///
    /// Ignored while nothing is loaded or the duration is unknown.
    pub fn seek(&mut self, fraction: f64) {
        if self.current_track.is_none() || !fraction.is_finite() {
            return;
        }
        let Some(duration) = self.duration() else {
            debug!("Seek ignored, duration unknown");
            return;
        };

        let position = duration.mul_f64(fraction.clamp(0.0, 1.0));
        self.sink.set_current_time(position);
        self.position = position;
        self.emit_position();
    }

    // ===== Transitions =====

    /// Current track finished: move on according to queues and modes
    pub async fn handle_media_ended(&mut self) -> Result<()> {
        let Some(current) = self.current_track.clone() else {
            return Ok(());
        };
        self.set_state(PlaybackState::Ended);

        // Repeat-track holds even when the current track sits outside the queues
        let action = if self.mode.repeat == RepeatMode::Track {
            NextAction::Replay
        } else {
            self.queues.compute_next(self.mode, self.unlimited)
        };
        info!(track_id = %current.id, ?action, "Track ended");

        match action {
            NextAction::Replay => {
                let kind = self.queues.active_kind().unwrap_or(QueueKind::User);
                self.enter_track(current, kind, false).await
            }
            NextAction::Advance { .. } | NextAction::SwitchToAuto | NextAction::WrapQueue { .. } => {
                let next = self.queues.apply_next(action).cloned();
                let kind = self.queues.active_kind();
                match (next, kind) {
                    (Some(track), Some(kind)) => self.enter_track(track, kind, true).await,
                    _ => {
                        self.halt();
                        Ok(())
                    }
                }
            }
            NextAction::RegenerateAuto => self.regenerate_auto(&current.id).await,
            NextAction::Stop => {
                self.halt();
                Ok(())
            }
        }
    }

    /// Skip the current track
    ///
    /// Reports the skip (best effort) then resolves the next track exactly as
    /// when the track ends.
    pub async fn skip(&mut self) -> Result<()> {
        if let Some(track) = &self.current_track {
            if let Err(e) = self.analytics.report_skip(&track.id).await {
                warn!(track_id = %track.id, error = %e, "Failed to report skip");
            }
        }
        self.handle_media_ended().await
    }

    /// Go to the previous track
    ///
    /// Restarts the current track when there is nothing to go back to.
    pub async fn previous(&mut self) -> Result<()> {
        if self.current_track.is_none() {
            return Ok(());
        }

        let action = self.queues.compute_prev(self.mode);
        debug!(?action, "Previous");

        match action {
            PrevAction::Replay | PrevAction::Stop => {
                self.restart_current();
                Ok(())
            }
            PrevAction::Retreat { .. }
            | PrevAction::SwitchToUser { .. }
            | PrevAction::WrapQueue { .. } => {
                let prev = self.queues.apply_prev(action).cloned();
                match (prev, self.queues.active_kind()) {
                    (Some(track), Some(kind)) => self.enter_track(track, kind, true).await,
                    _ => {
                        self.restart_current();
                        Ok(())
                    }
                }
            }
        }
    }

    async fn regenerate_auto(&mut self, seed: &TrackId) -> Result<()> {
        if self.session.is_none() {
            debug!("No playback session, not regenerating auto queue");
            self.halt();
            return Ok(());
        }

        // Supersede anything still in flight
        self.generation = self.generation.next();
        let tracks = self.generator.generate(seed).await;
        if tracks.is_empty() {
            info!(seed = %seed, "Regenerated auto queue is empty, stopping");
            self.halt();
            return Ok(());
        }

        self.generation = self.generation.next();
        let first = self.queues.adopt_queue(QueueKind::Auto, tracks, None).cloned();
        self.emit_queue_changed(QueueKind::Auto);
        match first {
            Some(track) => self.enter_track(track, QueueKind::Auto, false).await,
            None => {
                self.halt();
                Ok(())
            }
        }
    }

    async fn enter_track(&mut self, track: Track, kind: QueueKind, regenerate: bool) -> Result<()> {
        if kind == QueueKind::Auto {
            // The auto queue is now in use; pending results must not replace it
            self.generation = self.generation.next();
        } else if regenerate {
            self.request_auto_queue(track.id.clone());
        }

        self.load_track(track);
        self.start().await
    }

    fn load_track(&mut self, track: Track) {
        let previous_track_id = self.current_track.as_ref().map(|t| t.id.to_string());
        let uri = self.resolver.stream_url(&track.id);

        self.sink.set_source(&uri);
        self.sink.load();
        self.position = Duration::ZERO;
        self.duration = track.duration;

        let cursor = self.queues.cursor();
        info!(track_id = %track.id, kind = ?cursor.map(|c| c.kind), "Loading track");
        self.emit_event(PlaybackEvent::TrackChanged {
            track_id: track.id.to_string(),
            previous_track_id,
            kind: cursor.map(|c| c.kind),
            index: cursor.map(|c| c.index),
        });
        self.current_track = Some(track);
        self.set_state(PlaybackState::Loaded);
    }

    fn restart_current(&mut self) {
        self.sink.set_current_time(Duration::ZERO);
        self.position = Duration::ZERO;
        self.emit_position();
    }

    /// Nothing left to play: pause on the current track, keeping position
    fn halt(&mut self) {
        self.sink.pause();
        self.position = self.sink.current_time();
        self.set_state(PlaybackState::Paused);
    }

    // ===== Auto Queue =====

    fn request_auto_queue(&mut self, seed: TrackId) {
        if !self.unlimited {
            return;
        }
        if self.session.is_none() {
            debug!(seed = %seed, "No playback session, skipping auto queue generation");
            return;
        }

        self.generation = self.generation.next();
        debug!(seed = %seed, token = self.generation.value(), "Requesting auto queue");
        self.generator
            .spawn(self.generation, seed, self.completions_tx.clone());
        self.pending_generations += 1;
    }

    /// Install a finished generation as the auto queue
    ///
    /// Returns `false` when the result was superseded and discarded.
    pub fn apply_auto_queue(&mut self, completion: AutoQueueCompletion) -> bool {
        self.pending_generations = self.pending_generations.saturating_sub(1);

        if completion.token != self.generation {
            debug!(
                token = completion.token.value(),
                current = self.generation.value(),
                "Discarding stale auto queue"
            );
            self.emit_event(PlaybackEvent::AutoQueueDiscarded);
            return false;
        }

        let length = completion.tracks.len();
        self.generation = self.generation.next();
        self.queues.replace_queue(QueueKind::Auto, completion.tracks);
        info!(length, "Auto queue installed");
        self.emit_event(PlaybackEvent::AutoQueueInstalled { length });
        self.emit_queue_changed(QueueKind::Auto);
        true
    }

    /// Wait for the next background generation result
    ///
    /// Pending forever while nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<AutoQueueCompletion> {
        self.completions_rx.recv().await
    }

    /// Apply every generation result that already arrived
    pub fn poll_background(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_auto_queue(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for all in-flight generations and apply their results
    pub async fn settle_background(&mut self) {
        while self.pending_generations > 0 {
            match self.completions_rx.recv().await {
                Some(completion) => {
                    self.apply_auto_queue(completion);
                }
                None => break,
            }
        }
    }

    /// Number of generations still in flight
    pub fn pending_generations(&self) -> usize {
        self.pending_generations
    }

    /// Current generation epoch
    pub fn generation(&self) -> GenerationToken {
        self.generation
    }

    // ===== Sink =====

    /// Handle a notification from the media sink
    pub async fn on_sink_event(&mut self, event: SinkEvent) -> Result<()> {
        match event {
            SinkEvent::TimeUpdate(position) => {
                self.position = position;
                self.emit_position();
                Ok(())
            }
            SinkEvent::DurationKnown(duration) => {
                self.duration = Some(duration);
                self.emit_event(PlaybackEvent::DurationKnown {
                    duration_ms: duration.as_millis() as u64,
                });
                Ok(())
            }
            SinkEvent::Ended => self.handle_media_ended().await,
        }
    }

    /// Mutable access to the sink (listener registration)
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    // ===== Volume =====

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.volume.mute();
        self.apply_volume();
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.apply_volume();
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        self.sink.set_volume(self.volume.gain());
        self.emit_event(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    /// Volume state
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    // ===== Modes =====

    /// Set shuffle on or off
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.mode.shuffle = shuffle;
        self.emit_mode_changed();
    }

    /// Flip shuffle
    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.mode.shuffle);
    }

    /// Set repeat mode
    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.mode.repeat = repeat;
        self.emit_mode_changed();
    }

    /// Advance repeat mode: off, track, queue, off
    pub fn cycle_repeat(&mut self) {
        self.set_repeat(self.mode.repeat.cycle());
    }

    /// Turn auto-queue continuation on or off
    pub fn set_unlimited(&mut self, unlimited: bool) {
        self.unlimited = unlimited;
        self.emit_mode_changed();
    }

    /// Shuffle and repeat settings
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Whether auto-queue continuation is on
    pub fn unlimited(&self) -> bool {
        self.unlimited
    }

    // ===== Queue Management =====

    /// Append a track to the user queue
    pub fn add_to_user_queue(&mut self, track: Track) {
        debug!(track_id = %track.id, "Adding track to user queue");
        self.queues.push(QueueKind::User, track);
        self.emit_queue_changed(QueueKind::User);
    }

    /// Play row `index` of queue `kind`
    pub async fn play_from_queue(&mut self, kind: QueueKind, index: usize) -> Result<()> {
        let track = self
            .queues
            .move_to(kind, index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.enter_track(track, kind, true).await
    }

    /// Resolve `ids` and play them as the user queue
    ///
    /// Ids that fail to resolve are dropped; nothing happens if none resolve.
    pub async fn play_track_ids(&mut self, ids: &[TrackId]) -> Result<()> {
        let tracks = self.resolver.resolve_many(ids).await;
        let Some(first) = tracks.first().cloned() else {
            warn!(requested = ids.len(), "No tracks resolved, nothing to play");
            return Ok(());
        };
        self.play(first, Some(tracks), QueueKind::User).await
    }

    /// Record a play of an AI playlist and play its tracks
    pub async fn play_ai_playlist(&mut self, playlist: &PlaylistId, ids: &[TrackId]) -> Result<()> {
        if let Err(e) = self.analytics.report_play(playlist).await {
            warn!(playlist_id = %playlist, error = %e, "Failed to report playlist play");
        }
        self.play_track_ids(ids).await
    }

    /// Whether row `index` of queue `kind` is the loaded track
    pub fn is_current(&self, kind: QueueKind, index: usize) -> bool {
        self.queues.is_current(kind, index)
    }

    /// Queue state (read-only)
    pub fn queues(&self) -> &QueueState {
        &self.queues
    }

    // ===== State Queries =====

    /// Current transport state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Loaded track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Queue cursor
    pub fn cursor(&self) -> Option<QueueCursor> {
        self.queues.cursor()
    }

    /// Playback position
    pub fn position(&self) -> Duration {
        match self.state {
            PlaybackState::Playing => self.sink.current_time(),
            _ => self.position,
        }
    }

    /// Track duration, if known
    pub fn duration(&self) -> Option<Duration> {
        self.sink.duration().or(self.duration)
    }

    /// Copy of the state for UIs
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            current_track: self.current_track.clone(),
            cursor: self.queues.cursor(),
            user_queue: self.queues.queue(QueueKind::User).tracks().to_vec(),
            auto_queue: self.queues.queue(QueueKind::Auto).tracks().to_vec(),
            mode: self.mode,
            unlimited: self.unlimited,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            position: self.position(),
            duration: self.duration(),
        }
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn emit_event(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit_event(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_position(&mut self) {
        let duration_ms = self.duration().map_or(0, |d| d.as_millis() as u64);
        self.emit_event(PlaybackEvent::PositionUpdate {
            position_ms: self.position.as_millis() as u64,
            duration_ms,
        });
    }

    fn emit_queue_changed(&mut self, kind: QueueKind) {
        let length = self.queues.queue(kind).len();
        self.emit_event(PlaybackEvent::QueueChanged { kind, length });
    }

    fn emit_mode_changed(&mut self) {
        self.emit_event(PlaybackEvent::ModeChanged {
            mode: self.mode,
            unlimited: self.unlimited,
        });
    }
}
