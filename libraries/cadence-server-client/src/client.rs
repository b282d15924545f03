//! Main Cadence backend client.

use crate::analytics::AnalyticsClient;
use crate::catalog::CatalogClient;
use crate::error::{Result, ServerClientError};
use crate::queues::QueueClient;
use crate::types::{ServerConfig, SessionResponse};
use cadence_core::PlaybackSession;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Client for the Cadence backend.
///
/// Owns the HTTP connection pool and hands out borrowed sub-clients for the
/// catalog, smart queue, and analytics endpoints. The client also implements
/// every collaborator trait from `cadence-core`, so it can be plugged
/// straight into the playback engine.
///
/// # Example
///
/// ```ignore
/// use cadence_server_client::{CadenceClient, ServerConfig};
///
/// let client = CadenceClient::new(ServerConfig::new("http://localhost:8001"))?;
/// let session = client.create_session().await?;
/// let track = client.catalog().get_track("t-1").await?;
/// ```
#[derive(Clone)]
pub struct CadenceClient {
    http: Client,
    base_url: String,
    base: Url,
    access_token: Option<String>,
}

impl CadenceClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let base_url = config.url.trim_end_matches('/').to_string();
        let base =
            Url::parse(&base_url).map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;
        if base.scheme() != "http" && base.scheme() != "https" || base.cannot_be_a_base() {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        // Create HTTP client with reasonable defaults
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            base,
            access_token: config.access_token,
        })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Create a playback session.
    ///
    /// Called once when the player starts.
    pub async fn create_session(&self) -> Result<PlaybackSession> {
        let url = self.endpoint(&["playback-session"]);
        debug!(url = %url, "Creating playback session");

        let response = self.send(self.http.post(&url)).await?;
        let session: SessionResponse = parse_json(response, "session").await?;

        info!(session_id = %session.id, "Playback session created");
        Ok(session.into())
    }

    /// Get a catalog client for track lookups.
    pub fn catalog(&self) -> CatalogClient<'_> {
        CatalogClient::new(self)
    }

    /// Get a queue client for smart queue generation.
    pub fn queues(&self) -> QueueClient<'_> {
        QueueClient::new(self)
    }

    /// Get an analytics client for play and skip reports.
    pub fn analytics(&self) -> AnalyticsClient<'_> {
        AnalyticsClient::new(self)
    }

    /// Absolute URL of an API path.
    ///
    /// Each segment is percent-encoded, so ids containing `/`, `?` or `#`
    /// stay inside their own segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        // Always available: `new` rejects cannot-be-a-base URLs
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url.into()
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Attach credentials and send.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        request.send().await.map_err(ServerClientError::from_send)
    }
}

/// Turn a non-success response into a `ServerError`.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ServerClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

/// Check the status and parse the body.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T> {
    let response = check_status(response).await?;
    response.json().await.map_err(|e| {
        ServerClientError::ParseError(format!("Failed to parse {} response: {}", what, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(CadenceClient::new(ServerConfig::new("https://example.com")).is_ok());
        assert!(CadenceClient::new(ServerConfig::new("http://localhost:8001")).is_ok());

        // Invalid URLs
        assert!(CadenceClient::new(ServerConfig::new("")).is_err());
        assert!(CadenceClient::new(ServerConfig::new("not-a-url")).is_err());
        assert!(CadenceClient::new(ServerConfig::new("ftp://example.com")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client =
            CadenceClient::new(ServerConfig::new("https://example.com/")).expect("valid url");

        // URL should have trailing slash removed
        assert_eq!(client.url(), "https://example.com");
        assert_eq!(
            client.endpoint(&["tracks", "t-1"]),
            "https://example.com/api/tracks/t-1"
        );
    }

    #[test]
    fn endpoint_escapes_segments() {
        let client =
            CadenceClient::new(ServerConfig::new("https://example.com/music")).expect("valid url");

        assert_eq!(
            client.endpoint(&["tracks", "a/b?c#d", "stream"]),
            "https://example.com/music/api/tracks/a%2Fb%3Fc%23d/stream"
        );
    }
}
