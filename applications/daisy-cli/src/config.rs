/// Application configuration
///
/// Layered from `daisy.toml` (if present) and `DAISY_*` environment
/// variables. Nested keys use a double underscore, e.g.
/// `DAISY_PLAYBACK__POLL_INTERVAL_MS=500` or `DAISY_SPOTIFY__CLIENT_ID=...`.
use crate::error::{AppError, Result};
use daisy_catalog::{AppleMusicConfig, SpotifyConfig};
use daisy_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "daisy.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DAISY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub playback: PlaybackConfig,
    pub storage: StorageSettings,
    pub simulation: SimulationSettings,
    pub spotify: SpotifyConfig,
    pub apple: AppleMusicConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    pub database_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./daisy.db".to_string(),
        }
    }
}

/// Behaviour of the simulated audio backend used by the headless client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Length every simulated track reports
    pub track_duration_secs: u64,

    /// Delay before a simulated load resolves
    pub load_latency_ms: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            track_duration_secs: 180,
            load_latency_ms: 150,
        }
    }
}

impl SimulationSettings {
    pub fn track_duration(&self) -> Duration {
        Duration::from_secs(self.track_duration_secs)
    }

    pub fn load_latency(&self) -> Duration {
        Duration::from_millis(self.load_latency_ms)
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        Self::from_sources(&path, ENV_PREFIX)
    }

    /// Load from a specific file and environment prefix
    pub fn from_sources(file: &Path, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        if file.exists() {
            settings = settings.add_source(config::File::from(file.to_path_buf()));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.history_size == 0 {
            return Err(AppError::Config(
                "playback.history_size must be at least 1".to_string(),
            ));
        }

        if self.playback.poll_interval_ms == 0 {
            return Err(AppError::Config(
                "playback.poll_interval_ms must be at least 1".to_string(),
            ));
        }

        if self.storage.database_url.is_empty() {
            return Err(AppError::Config(
                "storage.database_url is required (set DAISY_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        Ok(())
    }
}
