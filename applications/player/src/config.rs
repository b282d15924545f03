/// Player configuration
use crate::error::{PlayerError, Result};
use cadence_playback::{AutoQueueConfig, PlaybackConfig, RepeatMode};
use cadence_server_client::ServerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_sink")]
    pub sink: SinkSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: u8,

    #[serde(default)]
    pub shuffle: bool,

    #[serde(default = "default_repeat")]
    pub repeat: RepeatMode,

    #[serde(default = "default_unlimited")]
    pub unlimited: bool,

    #[serde(default = "default_auto_queue_size")]
    pub auto_queue_size: usize,

    #[serde(default = "default_auto_queue_resolve_limit")]
    pub auto_queue_resolve_limit: usize,
}

/// Settings for the simulated output clock
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SinkSettings {
    /// Interval between position updates
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Length reported for tracks the catalog gives no duration for
    #[serde(default = "default_track_secs")]
    pub default_track_secs: u64,

    /// Simulated seconds per real second
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl CadenceConfig {
    /// Load configuration from `cadence.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a file and environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    /// Environment variables use the `CADENCE_` prefix with `__` between
    /// section and key, e.g. `CADENCE_SERVER__URL`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PlayerError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                // Load from config file if it exists
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (prefixed with CADENCE_)
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.url.is_empty() {
            return Err(PlayerError::Config(
                "Server URL is required (set CADENCE_SERVER__URL)".to_string(),
            ));
        }

        if self.playback.volume > 100 {
            return Err(PlayerError::Config(format!(
                "Volume must be 0-100, got {}",
                self.playback.volume
            )));
        }

        if self.playback.auto_queue_size == 0 {
            return Err(PlayerError::Config(
                "Auto queue size must be at least 1".to_string(),
            ));
        }

        if self.sink.tick_ms == 0 {
            return Err(PlayerError::Config("Sink tick must be at least 1ms".to_string()));
        }

        if !self.sink.speed.is_finite() || self.sink.speed <= 0.0 {
            return Err(PlayerError::Config("Sink speed must be positive".to_string()));
        }

        Ok(())
    }

    /// Connection settings for the backend client
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            url: self.server.url.clone(),
            access_token: self.server.access_token.clone(),
            timeout: Duration::from_secs(self.server.timeout_secs),
        }
    }

    /// Engine settings
    pub fn playback_config(&self) -> PlaybackConfig {
        let defaults = PlaybackConfig::default();

        PlaybackConfig {
            volume: self.playback.volume.min(100),
            shuffle: self.playback.shuffle,
            repeat: self.playback.repeat,
            unlimited: self.playback.unlimited,
            auto_queue: AutoQueueConfig {
                size: self.playback.auto_queue_size,
                resolve_limit: self.playback.auto_queue_resolve_limit,
                ..defaults.auto_queue
            },
        }
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        url: default_url(),
        access_token: None,
        timeout_secs: default_timeout_secs(),
    }
}

fn default_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        volume: default_volume(),
        shuffle: false,
        repeat: default_repeat(),
        unlimited: default_unlimited(),
        auto_queue_size: default_auto_queue_size(),
        auto_queue_resolve_limit: default_auto_queue_resolve_limit(),
    }
}

fn default_volume() -> u8 {
    80
}

fn default_repeat() -> RepeatMode {
    RepeatMode::Off
}

fn default_unlimited() -> bool {
    true
}

fn default_auto_queue_size() -> usize {
    50
}

fn default_auto_queue_resolve_limit() -> usize {
    20
}

fn default_sink() -> SinkSettings {
    SinkSettings {
        tick_ms: default_tick_ms(),
        default_track_secs: default_track_secs(),
        speed: default_speed(),
    }
}

fn default_tick_ms() -> u64 {
    250
}

fn default_track_secs() -> u64 {
    180
}

fn default_speed() -> f64 {
    1.0
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            playback: default_playback(),
            sink: default_sink(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_engine_defaults() {
        let config = CadenceConfig::default();
        config.validate().unwrap();

        let playback = config.playback_config();
        let engine_defaults = PlaybackConfig::default();
        assert_eq!(playback.volume, engine_defaults.volume);
        assert_eq!(playback.unlimited, engine_defaults.unlimited);
        assert_eq!(playback.auto_queue, engine_defaults.auto_queue);
    }

    #[test]
    fn loads_partial_file_with_defaults() {
        let file = write_config(
            r#"
[server]
url = "https://music.example.com"
access_token = "abc"

[playback]
volume = 55
repeat = "queue"
shuffle = true
"#,
        );

        let config = CadenceConfig::load_from(Some(file.path())).unwrap();
        config.validate().unwrap();

        assert_eq!(config.server.url, "https://music.example.com");
        assert_eq!(config.server.timeout_secs, 30);
        assert_eq!(config.playback.volume, 55);
        assert_eq!(config.playback.repeat, RepeatMode::Queue);
        assert!(config.playback.shuffle);
        assert!(config.playback.unlimited);
        assert_eq!(config.sink.tick_ms, 250);

        let server = config.server_config();
        assert_eq!(server.access_token.as_deref(), Some("abc"));
    }

    #[test]
    fn repeat_none_is_off() {
        let file = write_config("[playback]\nrepeat = \"none\"\n");
        let config = CadenceConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.playback.repeat, RepeatMode::Off);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = CadenceConfig::load_from(Some(Path::new("/nonexistent/cadence.toml")));
        assert!(matches!(result, Err(PlayerError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = CadenceConfig::default();
        config.playback.volume = 120;
        assert!(config.validate().is_err());

        let mut config = CadenceConfig::default();
        config.server.url = String::new();
        assert!(config.validate().is_err());

        let mut config = CadenceConfig::default();
        config.playback.auto_queue_size = 0;
        assert!(config.validate().is_err());

        let mut config = CadenceConfig::default();
        config.sink.speed = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn playback_config_carries_settings() {
        let mut config = CadenceConfig::default();
        config.playback.volume = 40;
        config.playback.auto_queue_size = 30;

        let playback = config.playback_config();
        assert_eq!(playback.volume, 40);
        assert_eq!(playback.auto_queue.size, 30);
        assert_eq!(playback.auto_queue.job_name, "Auto Queue");
    }
}
