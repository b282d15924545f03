//! Track id resolution
//!
//! Turns track ids into full `Track` records through the catalog. A lookup
//! that fails or returns nothing is dropped, so queues never contain
//! placeholders.

use cadence_core::{CatalogService, Track, TrackId};
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves ids against a catalog
#[derive(Clone)]
pub struct TrackResolver {
    catalog: Arc<dyn CatalogService>,
}

impl TrackResolver {
    /// Create a resolver backed by `catalog`
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }

    /// Resolve a single id
    ///
    /// Returns `None` when the catalog does not know the id or the lookup
    /// failed.
    pub async fn resolve(&self, id: &TrackId) -> Option<Track> {
        match self.catalog.resolve_track(id).await {
            Ok(Some(track)) => Some(track),
            Ok(None) => {
                debug!(track_id = %id, "Track not found in catalog");
                None
            }
            Err(e) => {
                warn!(track_id = %id, error = %e, "Failed to resolve track");
                None
            }
        }
    }

    /// Resolve many ids concurrently
    ///
    /// Output keeps input order with unresolved ids removed.
    pub async fn resolve_many(&self, ids: &[TrackId]) -> Vec<Track> {
        let lookups = ids.iter().map(|id| self.resolve(id));
        join_all(lookups).await.into_iter().flatten().collect()
    }

    /// URI the sink should load for `id`
    pub fn stream_url(&self, id: &TrackId) -> String {
        self.catalog.stream_url(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cadence_core::{CoreError, Result};

    struct OddCatalog;

    #[async_trait]
    impl CatalogService for OddCatalog {
        async fn resolve_track(&self, id: &TrackId) -> Result<Option<Track>> {
            match id.as_str() {
                "missing" => Ok(None),
                "broken" => Err(CoreError::unavailable("catalog down")),
                other => Ok(Some(Track::new(id.clone(), other, "Artist"))),
            }
        }

        fn stream_url(&self, id: &TrackId) -> String {
            format!("mem://{}", id)
        }
    }

    #[tokio::test]
    async fn resolve_many_drops_failures_and_keeps_order() {
        let resolver = TrackResolver::new(Arc::new(OddCatalog));
        let ids: Vec<TrackId> = ["c", "missing", "a", "broken", "b"]
            .into_iter()
            .map(TrackId::new)
            .collect();

        let tracks = resolver.resolve_many(&ids).await;
        let resolved: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(resolved, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn stream_url_comes_from_catalog() {
        let resolver = TrackResolver::new(Arc::new(OddCatalog));
        assert_eq!(resolver.stream_url(&TrackId::new("x")), "mem://x");
    }
}
