//! Cadence Server Client
//!
//! HTTP client library for the Cadence backend API.
//!
//! # Features
//!
//! - **Catalog**: Resolve track ids, build stream URLs
//! - **Sessions**: Create the playback session at startup
//! - **Smart queues**: Create, generate, and read auto queues
//! - **Analytics**: Report skips and AI playlist plays
//!
//! `CadenceClient` implements every collaborator trait from `cadence-core`.
//!
//! # Example
//!
//! ```ignore
//! use cadence_server_client::{CadenceClient, ServerConfig};
//! use cadence_playback::{Collaborators, PlaybackConfig, PlaybackEngine};
//! use std::sync::Arc;
//!
//! let client = Arc::new(CadenceClient::new(ServerConfig::new("http://localhost:8001"))?);
//! let engine = PlaybackEngine::new(
//!     PlaybackConfig::default(),
//!     my_sink,
//!     Collaborators::from_backend(client),
//! );
//! ```

mod analytics;
mod catalog;
mod client;
mod error;
mod queues;
mod services;
mod types;

// Re-export main types
pub use client::CadenceClient;
pub use error::{Result, ServerClientError};
pub use queues::AUTO_QUEUE_TYPE;
pub use types::{
    CreateSmartQueueRequest, ServerConfig, ServerTrack, SessionResponse, SmartQueueResponse,
};

// Re-export sub-clients for direct use if needed
pub use analytics::AnalyticsClient;
pub use catalog::CatalogClient;
pub use queues::QueueClient;
