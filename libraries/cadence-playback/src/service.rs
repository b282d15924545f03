//! Engine service
//!
//! Runs a [`PlaybackEngine`] on its own task. Callers talk to it through a
//! cloneable [`PlaybackHandle`] (commands in) and a broadcast channel (events
//! out). The service is the only owner of the engine, so no locks are needed.
//!
//! Track transitions (`MediaEnded`, `Skip`, the sink's `Ended`) run one at a
//! time. While one is in flight another transition request is rejected with
//! an error event; every other command waits until the transition is done.

use crate::{
    engine::{PlaybackEngine, PlaybackSnapshot},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    sink::{MediaSink, SinkEvent},
    types::{QueueKind, RepeatMode},
};
use cadence_core::{PlaylistId, Track, TrackId};
use std::collections::VecDeque;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Commands accepted by the service
#[derive(Debug)]
pub enum PlaybackCommand {
    /// Play a track, optionally adopting a queue
    Play {
        track: Track,
        queue: Option<Vec<Track>>,
        kind: QueueKind,
    },
    /// Play a row of one of the queues
    PlayFromQueue { kind: QueueKind, index: usize },
    /// Resolve ids and play them as the user queue
    PlayTrackIds(Vec<TrackId>),
    /// Report and play an AI playlist
    PlayAiPlaylist {
        playlist: PlaylistId,
        track_ids: Vec<TrackId>,
    },
    /// Append to the user queue
    AddToUserQueue(Track),
    Start,
    Pause,
    Resume,
    TogglePlayPause,
    /// Seek to a fraction (0.0 - 1.0) of the track
    Seek(f64),
    /// Set volume (0-100)
    SetVolume(u8),
    Mute,
    Unmute,
    /// The current track finished
    MediaEnded,
    /// Skip the current track
    Skip,
    Previous,
    SetShuffle(bool),
    ToggleShuffle,
    SetRepeat(RepeatMode),
    CycleRepeat,
    SetUnlimited(bool),
    /// Request a copy of the engine state
    Snapshot(oneshot::Sender<PlaybackSnapshot>),
    /// Stop the service
    Shutdown,
}

impl PlaybackCommand {
    fn is_transition(&self) -> bool {
        matches!(self, PlaybackCommand::MediaEnded | PlaybackCommand::Skip)
    }
}

/// Cloneable handle to a running service
#[derive(Clone)]
pub struct PlaybackHandle {
    commands: mpsc::UnboundedSender<PlaybackCommand>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackHandle {
    /// Send a raw command
    pub fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::ServiceStopped)
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Play a track, optionally adopting a queue
    pub fn play(&self, track: Track, queue: Option<Vec<Track>>, kind: QueueKind) -> Result<()> {
        self.send(PlaybackCommand::Play { track, queue, kind })
    }

    /// Play a row of one of the queues
    pub fn play_from_queue(&self, kind: QueueKind, index: usize) -> Result<()> {
        self.send(PlaybackCommand::PlayFromQueue { kind, index })
    }

    /// Resolve ids and play them as the user queue
    pub fn play_track_ids(&self, ids: Vec<TrackId>) -> Result<()> {
        self.send(PlaybackCommand::PlayTrackIds(ids))
    }

    /// Pause playback
    pub fn pause(&self) -> Result<()> {
        self.send(PlaybackCommand::Pause)
    }

    /// Resume playback
    pub fn resume(&self) -> Result<()> {
        self.send(PlaybackCommand::Resume)
    }

    /// Skip the current track
    pub fn skip(&self) -> Result<()> {
        self.send(PlaybackCommand::Skip)
    }

    /// Go to the previous track
    pub fn previous(&self) -> Result<()> {
        self.send(PlaybackCommand::Previous)
    }

    /// Report the end of the current track
    pub fn media_ended(&self) -> Result<()> {
        self.send(PlaybackCommand::MediaEnded)
    }

    /// Copy of the engine state
    pub async fn snapshot(&self) -> Result<PlaybackSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(PlaybackCommand::Snapshot(tx))?;
        rx.await.map_err(|_| PlaybackError::ServiceStopped)
    }

    /// Stop the service
    pub fn shutdown(&self) -> Result<()> {
        self.send(PlaybackCommand::Shutdown)
    }
}

enum Work {
    Command(PlaybackCommand),
    Sink(SinkEvent),
    Background(crate::autoqueue::AutoQueueCompletion),
}

/// Owner of a running engine
pub struct PlaybackService<S: MediaSink> {
    engine: PlaybackEngine<S>,
    commands: mpsc::UnboundedReceiver<PlaybackCommand>,
    events: broadcast::Sender<PlaybackEvent>,
    deferred: VecDeque<PlaybackCommand>,
}

impl<S: MediaSink + 'static> PlaybackService<S> {
    /// Start the service on the current runtime
    pub fn spawn(engine: PlaybackEngine<S>) -> (PlaybackHandle, JoinHandle<PlaybackEngine<S>>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let service = Self {
            engine,
            commands: commands_rx,
            events: events_tx.clone(),
            deferred: VecDeque::new(),
        };
        let handle = PlaybackHandle {
            commands: commands_tx,
            events: events_tx,
        };

        (handle, tokio::spawn(service.run()))
    }

    /// Service loop; returns the engine once shut down
    async fn run(mut self) -> PlaybackEngine<S> {
        let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
        let listener = self.engine.sink_mut().subscribe(sink_tx);
        info!("Playback service started");

        loop {
            self.publish_events();

            let work = match self.deferred.pop_front() {
                Some(command) => Work::Command(command),
                None => tokio::select! {
                    command = self.commands.recv() => match command {
                        Some(command) => Work::Command(command),
                        None => break,
                    },
                    Some(event) = sink_rx.recv() => Work::Sink(event),
                    Some(completion) = self.engine.next_completion() => Work::Background(completion),
                },
            };

            match work {
                Work::Command(PlaybackCommand::Shutdown) => break,
                Work::Command(command) if command.is_transition() => {
                    let skip = matches!(command, PlaybackCommand::Skip);
                    self.run_transition(skip).await;
                }
                Work::Command(command) => self.dispatch(command).await,
                Work::Sink(SinkEvent::Ended) => self.run_transition(false).await,
                Work::Sink(event) => {
                    if let Err(e) = self.engine.on_sink_event(event).await {
                        debug!(error = %e, "Sink event handling failed");
                    }
                }
                Work::Background(completion) => {
                    self.engine.apply_auto_queue(completion);
                }
            }
        }

        self.engine.sink_mut().unsubscribe(listener);
        self.publish_events();
        info!("Playback service stopped");
        self.engine
    }

    /// Run one transition, rejecting overlapping ones and deferring the rest
    async fn run_transition(&mut self, skip: bool) {
        let engine = &mut self.engine;
        let commands = &mut self.commands;
        let deferred = &mut self.deferred;
        let events = &self.events;

        let transition = async move {
            if skip {
                engine.skip().await
            } else {
                engine.handle_media_ended().await
            }
        };
        tokio::pin!(transition);

        let mut commands_open = true;
        let result = loop {
            tokio::select! {
                result = &mut transition => break result,
                command = commands.recv(), if commands_open => match command {
                    Some(command) if command.is_transition() => {
                        warn!(?command, "Transition already in progress, rejecting");
                        let _ = events.send(PlaybackEvent::error(
                            PlaybackError::TransitionInProgress.to_string(),
                        ));
                    }
                    Some(command) => deferred.push_back(command),
                    None => commands_open = false,
                },
            }
        };

        if let Err(e) = result {
            debug!(error = %e, "Transition finished with error");
        }
    }

    async fn dispatch(&mut self, command: PlaybackCommand) {
        let engine = &mut self.engine;
        let result = match command {
            PlaybackCommand::Play { track, queue, kind } => engine.play(track, queue, kind).await,
            PlaybackCommand::PlayFromQueue { kind, index } => {
                engine.play_from_queue(kind, index).await
            }
            PlaybackCommand::PlayTrackIds(ids) => engine.play_track_ids(&ids).await,
            PlaybackCommand::PlayAiPlaylist {
                playlist,
                track_ids,
            } => engine.play_ai_playlist(&playlist, &track_ids).await,
            PlaybackCommand::AddToUserQueue(track) => {
                engine.add_to_user_queue(track);
                Ok(())
            }
            PlaybackCommand::Start => engine.start().await,
            PlaybackCommand::Pause => {
                engine.pause();
                Ok(())
            }
            PlaybackCommand::Resume => engine.resume().await,
            PlaybackCommand::TogglePlayPause => engine.toggle_play_pause().await,
            PlaybackCommand::Seek(fraction) => {
                engine.seek(fraction);
                Ok(())
            }
            PlaybackCommand::SetVolume(level) => {
                engine.set_volume(level);
                Ok(())
            }
            PlaybackCommand::Mute => {
                engine.mute();
                Ok(())
            }
            PlaybackCommand::Unmute => {
                engine.unmute();
                Ok(())
            }
            PlaybackCommand::Previous => engine.previous().await,
            PlaybackCommand::SetShuffle(shuffle) => {
                engine.set_shuffle(shuffle);
                Ok(())
            }
            PlaybackCommand::ToggleShuffle => {
                engine.toggle_shuffle();
                Ok(())
            }
            PlaybackCommand::SetRepeat(repeat) => {
                engine.set_repeat(repeat);
                Ok(())
            }
            PlaybackCommand::CycleRepeat => {
                engine.cycle_repeat();
                Ok(())
            }
            PlaybackCommand::SetUnlimited(unlimited) => {
                engine.set_unlimited(unlimited);
                Ok(())
            }
            PlaybackCommand::Snapshot(reply) => {
                let _ = reply.send(engine.snapshot());
                Ok(())
            }
            // Handled by the loop
            PlaybackCommand::MediaEnded | PlaybackCommand::Skip | PlaybackCommand::Shutdown => {
                Ok(())
            }
        };

        if let Err(e) = result {
            debug!(error = %e, "Command failed");
        }
    }

    fn publish_events(&mut self) {
        for event in self.engine.drain_events() {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
    }
}
