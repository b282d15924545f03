/// Collaborator traits for Cadence
///
/// The playback engine consumes these; `cadence-server-client` implements
/// them over HTTP. All of them are object safe so the engine can hold
/// `Arc<dyn ...>` handles.
use crate::error::Result;
use crate::types::{JobId, PlaybackSession, PlaylistId, Track, TrackId};
use async_trait::async_trait;

/// Track catalog
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Resolve a track identifier to its full record
    ///
    /// Returns `Ok(None)` when the catalog does not know the track and an
    /// error when the catalog could not be asked.
    async fn resolve_track(&self, id: &TrackId) -> Result<Option<Track>>;

    /// URI the media sink should load to play the track
    fn stream_url(&self, id: &TrackId) -> String;
}

/// Playback session registry
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create the process-wide playback session
    async fn create_session(&self) -> Result<PlaybackSession>;
}

/// Auto-queue recommendation backend
///
/// Generation is a three step protocol: create a job, run the generation
/// seeded on a track, then fetch the ordered result.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Create a new auto-queue generation job
    async fn create_auto_queue_job(&self, name: &str) -> Result<JobId>;

    /// Run generation for a job, seeded on a track
    async fn run_auto_generation(&self, job: &JobId, seed: &TrackId, size: usize) -> Result<()>;

    /// Fetch the ordered track ids a job produced
    async fn fetch_generated_queue(&self, job: &JobId) -> Result<Vec<TrackId>>;
}

/// Listening analytics
#[async_trait]
pub trait AnalyticsService: Send + Sync {
    /// Record that the listener skipped a track
    async fn report_skip(&self, id: &TrackId) -> Result<()>;

    /// Mark an AI-generated playlist as played
    async fn report_play(&self, playlist: &PlaylistId) -> Result<()>;
}
