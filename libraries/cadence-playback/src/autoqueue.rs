//! Auto-queue generation
//!
//! Generation talks to the recommendation backend in three steps (create job,
//! run, fetch) and resolves the first few ids into tracks. It runs in the
//! background and reports back over a channel; every request carries a
//! [`GenerationToken`] so the engine can tell a current result from one that
//! was superseded while it was in flight.

use crate::resolver::TrackResolver;
use crate::types::AutoQueueConfig;
use cadence_core::{RecommendationService, Track, TrackId};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Epoch of auto-queue generation requests
///
/// Advanced whenever the auto queue is adopted or replaced, or a new
/// generation is requested. A completion is only applied if its token still
/// equals the engine's current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GenerationToken(u64);

impl GenerationToken {
    /// Token following this one
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw epoch value
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Result of one background generation
#[derive(Debug, Clone)]
pub struct AutoQueueCompletion {
    /// Epoch the request was issued under
    pub token: GenerationToken,

    /// Resolved tracks, possibly empty
    pub tracks: Vec<Track>,
}

/// Produces auto queues seeded on a track
#[derive(Clone)]
pub struct AutoQueueGenerator {
    recommendations: Arc<dyn RecommendationService>,
    resolver: TrackResolver,
    config: AutoQueueConfig,
}

impl AutoQueueGenerator {
    /// Create a generator
    pub fn new(
        recommendations: Arc<dyn RecommendationService>,
        resolver: TrackResolver,
        config: AutoQueueConfig,
    ) -> Self {
        Self {
            recommendations,
            resolver,
            config,
        }
    }

    /// Generate an auto queue seeded on `seed`
    ///
    /// Never fails: any backend error yields an empty list, and ids that do
    /// not resolve are dropped.
    pub async fn generate(&self, seed: &TrackId) -> Vec<Track> {
        match self.try_generate(seed).await {
            Ok(tracks) => {
                info!(seed = %seed, count = tracks.len(), "Auto queue generated");
                tracks
            }
            Err(e) => {
                warn!(seed = %seed, error = %e, "Auto queue generation failed");
                Vec::new()
            }
        }
    }

    async fn try_generate(&self, seed: &TrackId) -> cadence_core::Result<Vec<Track>> {
        let size = self.config.size.min(self.config.max_request);

        let job = self
            .recommendations
            .create_auto_queue_job(&self.config.job_name)
            .await?;
        debug!(job = %job, seed = %seed, size, "Running auto queue generation");

        self.recommendations
            .run_auto_generation(&job, seed, size)
            .await?;

        let mut ids = self.recommendations.fetch_generated_queue(&job).await?;
        ids.truncate(self.config.resolve_limit);

        Ok(self.resolver.resolve_many(&ids).await)
    }

    /// Run a generation in the background
    ///
    /// The completion is sent even when the result is empty. A closed
    /// receiver means the engine is gone and the result is dropped.
    pub fn spawn(
        &self,
        token: GenerationToken,
        seed: TrackId,
        completions: UnboundedSender<AutoQueueCompletion>,
    ) -> JoinHandle<()> {
        let generator = self.clone();
        tokio::spawn(async move {
            let tracks = generator.generate(&seed).await;
            if completions
                .send(AutoQueueCompletion { token, tracks })
                .is_err()
            {
                debug!(token = token.value(), "Engine gone, dropping auto queue");
            }
        })
    }
}
