mod ids;
mod session;
mod track;

pub use ids::{JobId, PlaylistId, SessionId, TrackId};
pub use session::PlaybackSession;
pub use track::Track;
