/// Cadence Player - headless dual-queue player
use cadence_core::{PlaylistId, TrackId};
use cadence_player::{CadenceConfig, ClockSink};
use cadence_playback::{
    Collaborators, PlaybackCommand, PlaybackEngine, PlaybackEvent, PlaybackService, PlaybackState,
    QueueKind, RepeatMode,
};
use cadence_server_client::CadenceClient;
use clap::{Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-player")]
#[command(about = "Cadence headless player", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play tracks, continuing into generated tracks when they run out
    Play {
        /// Track ids, in queue order
        #[arg(required = true)]
        track_ids: Vec<String>,
        /// Report the list as a play of this AI playlist
        #[arg(long)]
        playlist: Option<String>,
        /// Start with shuffle on
        #[arg(long)]
        shuffle: bool,
        /// Repeat mode to start with
        #[arg(long, value_enum)]
        repeat: Option<RepeatArg>,
        /// Disable auto-queue continuation
        #[arg(long)]
        no_unlimited: bool,
        /// Stop after this many track changes
        #[arg(long)]
        max_tracks: Option<usize>,
    },
    /// Check configuration and create a playback session
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    None,
    Track,
    Queue,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::None => RepeatMode::Off,
            RepeatArg::Track => RepeatMode::Track,
            RepeatArg::Queue => RepeatMode::Queue,
        }
    }
}

struct PlayOptions {
    track_ids: Vec<String>,
    playlist: Option<String>,
    shuffle: bool,
    repeat: Option<RepeatArg>,
    unlimited: bool,
    max_tracks: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_player=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = CadenceConfig::load_from(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Play {
            track_ids,
            playlist,
            shuffle,
            repeat,
            no_unlimited,
            max_tracks,
        } => {
            let options = PlayOptions {
                track_ids,
                playlist,
                shuffle,
                repeat,
                unlimited: !no_unlimited,
                max_tracks,
            };
            play(config, options).await?;
        }
        Commands::Check => {
            check(config).await?;
        }
    }

    Ok(())
}

async fn play(config: CadenceConfig, options: PlayOptions) -> anyhow::Result<()> {
    let client = Arc::new(CadenceClient::new(config.server_config())?);
    tracing::info!("Using server {}", client.url());

    let mut playback = config.playback_config();
    playback.shuffle |= options.shuffle;
    if let Some(repeat) = options.repeat {
        playback.repeat = repeat.into();
    }
    playback.unlimited &= options.unlimited;

    let sink = ClockSink::new(&config.sink);
    let mut engine = PlaybackEngine::new(playback, sink, Collaborators::from_backend(client));
    if !engine.start_session().await {
        tracing::warn!("No playback session; continuing without auto queue");
    }

    let (handle, service) = PlaybackService::spawn(engine);
    let mut events = handle.subscribe();

    let ids: Vec<TrackId> = options.track_ids.into_iter().map(TrackId::new).collect();
    match options.playlist {
        Some(playlist) => handle.send(PlaybackCommand::PlayAiPlaylist {
            playlist: PlaylistId::new(playlist),
            track_ids: ids,
        })?,
        None => handle.play_track_ids(ids)?,
    }

    // Commands run in order, so this sees the result of the play request
    let snapshot = handle.snapshot().await?;
    if snapshot.current_track.is_none() {
        tracing::warn!("None of the requested tracks could be resolved");
        handle.shutdown()?;
        service.await?;
        return Ok(());
    }

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);
    let mut track_changes = 0usize;

    loop {
        tokio::select! {
            _ = &mut interrupted => {
                tracing::info!("Interrupted");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    log_event(&event);
                    match event {
                        PlaybackEvent::TrackChanged { .. } => {
                            track_changes += 1;
                            if options.max_tracks.is_some_and(|max| track_changes > max) {
                                tracing::info!("Track limit reached");
                                break;
                            }
                        }
                        PlaybackEvent::StateChanged { state: PlaybackState::Paused } => {
                            tracing::info!("Playback halted");
                            break;
                        }
                        _ => {}
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Event listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    handle.shutdown()?;
    let engine = service.await?;
    tracing::info!(
        state = ?engine.state(),
        user_queue = engine.queues().queue(QueueKind::User).len(),
        auto_queue = engine.queues().queue(QueueKind::Auto).len(),
        "Player stopped"
    );

    Ok(())
}

async fn check(config: CadenceConfig) -> anyhow::Result<()> {
    let client = CadenceClient::new(config.server_config())?;
    tracing::info!("Checking server {}", client.url());

    let session = client.create_session().await?;
    println!("Server OK");
    println!("  url:     {}", client.url());
    println!("  session: {}", session.id);

    Ok(())
}

fn log_event(event: &PlaybackEvent) {
    match event {
        PlaybackEvent::TrackChanged {
            track_id,
            kind,
            index,
            ..
        } => {
            tracing::info!(track_id = %track_id, kind = ?kind, index = ?index, "Now playing");
        }
        PlaybackEvent::StateChanged { state } => {
            tracing::info!(state = ?state, "State changed");
        }
        PlaybackEvent::AutoQueueInstalled { length } => {
            tracing::info!(length, "Auto queue ready");
        }
        PlaybackEvent::Error { message } => {
            tracing::warn!("{}", message);
        }
        PlaybackEvent::PositionUpdate {
            position_ms,
            duration_ms,
        } => {
            tracing::trace!(position_ms, duration_ms, "Position");
        }
        other => {
            tracing::debug!(event = ?other, "Playback event");
        }
    }
}
