//! Track catalog operations.

use crate::client::{parse_json, CadenceClient};
use crate::error::Result;
use crate::types::ServerTrack;
use reqwest::StatusCode;
use tracing::debug;

/// Catalog client for the Cadence backend.
pub struct CatalogClient<'a> {
    client: &'a CadenceClient,
}

impl<'a> CatalogClient<'a> {
    pub(crate) fn new(client: &'a CadenceClient) -> Self {
        Self { client }
    }

    /// Get a single track by ID.
    ///
    /// Returns `Ok(None)` when the server does not know the track.
    pub async fn get_track(&self, track_id: &str) -> Result<Option<ServerTrack>> {
        let url = self.client.endpoint(&["tracks", track_id]);
        debug!(url = %url, track_id = %track_id, "Fetching track");

        let response = self.client.send(self.client.http().get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(track_id = %track_id, "Track not found");
            return Ok(None);
        }

        parse_json(response, "track").await.map(Some)
    }

    /// URL the media sink should load to stream a track.
    ///
    /// Built locally; the endpoint streams the audio file directly.
    pub fn stream_url(&self, track_id: &str) -> String {
        self.client.endpoint(&["tracks", track_id, "stream"])
    }
}
