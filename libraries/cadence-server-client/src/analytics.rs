//! Listening analytics reports.

use crate::client::{check_status, CadenceClient};
use crate::error::Result;
use tracing::debug;

/// Analytics client for the Cadence backend.
pub struct AnalyticsClient<'a> {
    client: &'a CadenceClient,
}

impl<'a> AnalyticsClient<'a> {
    pub(crate) fn new(client: &'a CadenceClient) -> Self {
        Self { client }
    }

    /// Record that a track was skipped.
    pub async fn report_skip(&self, track_id: &str) -> Result<()> {
        let url = self.client.endpoint(&["tracks", track_id, "skip"]);
        debug!(url = %url, track_id = %track_id, "Reporting skip");

        let response = self.client.send(self.client.http().post(&url)).await?;
        check_status(response).await?;
        Ok(())
    }

    /// Record that an AI playlist was played.
    pub async fn report_ai_playlist_play(&self, playlist_id: &str) -> Result<()> {
        let url = self
            .client
            .endpoint(&["ai-playlists", playlist_id, "play"]);
        debug!(url = %url, playlist_id = %playlist_id, "Reporting playlist play");

        let response = self.client.send(self.client.http().post(&url)).await?;
        check_status(response).await?;
        Ok(())
    }
}
