//! Collaborator trait implementations.
//!
//! Maps the HTTP sub-clients onto the `cadence-core` traits so the playback
//! engine can use a `CadenceClient` as its catalog, session registry,
//! recommendation backend, and analytics sink.

use crate::client::CadenceClient;
use crate::queues::AUTO_QUEUE_TYPE;
use async_trait::async_trait;
use cadence_core::{
    AnalyticsService, CatalogService, JobId, PlaybackSession, PlaylistId, RecommendationService,
    Result, SessionService, Track, TrackId,
};

#[async_trait]
impl CatalogService for CadenceClient {
    async fn resolve_track(&self, id: &TrackId) -> Result<Option<Track>> {
        let track = self.catalog().get_track(id.as_str()).await?;
        Ok(track.map(Track::from))
    }

    fn stream_url(&self, id: &TrackId) -> String {
        self.catalog().stream_url(id.as_str())
    }
}

#[async_trait]
impl SessionService for CadenceClient {
    async fn create_session(&self) -> Result<PlaybackSession> {
        Ok(CadenceClient::create_session(self).await?)
    }
}

#[async_trait]
impl RecommendationService for CadenceClient {
    async fn create_auto_queue_job(&self, name: &str) -> Result<JobId> {
        let queue = self
            .queues()
            .create_smart_queue(name, AUTO_QUEUE_TYPE)
            .await?;
        Ok(queue.job_id())
    }

    async fn run_auto_generation(&self, job: &JobId, seed: &TrackId, size: usize) -> Result<()> {
        self.queues()
            .generate_auto(job.as_str(), seed.as_str(), size)
            .await?;
        Ok(())
    }

    async fn fetch_generated_queue(&self, job: &JobId) -> Result<Vec<TrackId>> {
        let queue = self.queues().get_smart_queue(job.as_str()).await?;
        Ok(queue.track_ids())
    }
}

#[async_trait]
impl AnalyticsService for CadenceClient {
    async fn report_skip(&self, id: &TrackId) -> Result<()> {
        self.analytics().report_skip(id.as_str()).await?;
        Ok(())
    }

    async fn report_play(&self, playlist: &PlaylistId) -> Result<()> {
        self.analytics()
            .report_ai_playlist_play(playlist.as_str())
            .await?;
        Ok(())
    }
}
