//! Smart queue generation.
//!
//! Auto queues are produced server-side in three calls: create an empty
//! smart queue, ask the server to fill it from a seed track, then read it
//! back.

use crate::client::{check_status, parse_json, CadenceClient};
use crate::error::{Result, ServerClientError};
use crate::types::{CreateSmartQueueRequest, SmartQueueResponse};
use reqwest::StatusCode;
use tracing::debug;

/// Queue type the server uses for generated continuation queues
pub const AUTO_QUEUE_TYPE: &str = "auto";

/// Smart queue client for the Cadence backend.
pub struct QueueClient<'a> {
    client: &'a CadenceClient,
}

impl<'a> QueueClient<'a> {
    pub(crate) fn new(client: &'a CadenceClient) -> Self {
        Self { client }
    }

    /// Create an empty smart queue.
    pub async fn create_smart_queue(
        &self,
        name: &str,
        queue_type: &str,
    ) -> Result<SmartQueueResponse> {
        let url = self.client.endpoint(&["smart-queues"]);
        debug!(url = %url, name = %name, queue_type = %queue_type, "Creating smart queue");

        let body = CreateSmartQueueRequest { name, queue_type };
        let response = self
            .client
            .send(self.client.http().post(&url).json(&body))
            .await?;

        parse_json(response, "smart queue").await
    }

    /// Fill a smart queue with tracks similar to `seed_track_id`.
    pub async fn generate_auto(
        &self,
        queue_id: &str,
        seed_track_id: &str,
        size: usize,
    ) -> Result<()> {
        let url = self
            .client
            .endpoint(&["smart-queues", queue_id, "generate-auto"]);
        debug!(url = %url, seed_track_id = %seed_track_id, size, "Generating auto queue");

        let request = self
            .client
            .http()
            .post(&url)
            .query(&[
                ("seed_track_id", seed_track_id.to_string()),
                ("size", size.to_string()),
            ]);
        let response = self.client.send(request).await?;

        check_status(response).await?;
        Ok(())
    }

    /// Read a smart queue, including its generated track ids.
    pub async fn get_smart_queue(&self, queue_id: &str) -> Result<SmartQueueResponse> {
        let url = self.client.endpoint(&["smart-queues", queue_id]);
        debug!(url = %url, "Fetching smart queue");

        let response = self.client.send(self.client.http().get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ServerClientError::NotFound(queue_id.to_string()));
        }
        let queue: SmartQueueResponse = parse_json(response, "smart queue").await?;

        debug!(queue_id = %queue.id, tracks = queue.track_ids.len(), "Fetched smart queue");
        Ok(queue)
    }
}
