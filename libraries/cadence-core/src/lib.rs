//! Cadence Core
//!
//! Domain types, collaborator traits, and error handling shared by every
//! Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlaybackSession`, and the string-backed IDs
//! - **Collaborator Traits**: `CatalogService`, `SessionService`,
//!   `RecommendationService`, `AnalyticsService`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! The playback engine only talks to the outside world through the
//! collaborator traits, so it can run against the HTTP client, an in-memory
//! fake, or anything else that implements them.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Track, TrackId};
//! use std::time::Duration;
//!
//! let track = Track::new(TrackId::new("t-1"), "Blue in Green", "Miles Davis")
//!     .with_album("Kind of Blue")
//!     .with_duration(Duration::from_secs(337));
//!
//! assert_eq!(track.display_album(), "Kind of Blue");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use traits::{AnalyticsService, CatalogService, RecommendationService, SessionService};
pub use types::{JobId, PlaybackSession, PlaylistId, SessionId, Track, TrackId};
