//! Cadence Player Library
//!
//! Headless player: configuration loading and a clock-driven media sink for
//! running the playback engine without an audio device.
//!
//! This library exposes the components for testing purposes.

pub mod config;
pub mod error;
pub mod sink;

// Re-export commonly used types for convenience
pub use config::{CadenceConfig, PlaybackSettings, ServerSettings, SinkSettings};
pub use error::{PlayerError, Result};
pub use sink::ClockSink;
