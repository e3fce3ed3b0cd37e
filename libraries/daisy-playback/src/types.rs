//! Core types for playback management

use daisy_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport phase
///
/// `Playing` and `Paused` together form the "ready" state: a handle is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportPhase {
    /// No handle loaded
    Idle,

    /// Waiting for the backend to finish loading
    Loading,

    /// Loaded and audible
    Playing,

    /// Loaded, paused mid-track
    Paused,
}

impl TransportPhase {
    /// Check if a handle is loaded
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the playlist wraps
    #[default]
    Off,

    /// Loop entire playlist
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Next mode in the Off -> All -> One -> Off cycle
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

/// Configuration for playback manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Status poll interval in milliseconds (default: 1000)
    pub poll_interval_ms: u64,

    /// How early before the end a track counts as finished (default: 1000)
    pub end_tolerance_ms: u64,

    /// Maximum shuffle history size (default: 50)
    pub history_size: usize,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,
}

impl PlaybackConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn end_tolerance(&self) -> Duration {
        Duration::from_millis(self.end_tolerance_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            end_tolerance_ms: 1000,
            history_size: 50,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// ISO overlay state as seen from outside the manager
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub active: bool,
    pub paused_position: Duration,
    pub active_alternate: Option<String>,
}

/// Point-in-time view of the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportSnapshot {
    pub phase: TransportPhase,

    /// Playlist index; retained while a one-off preview is loaded
    pub current_index: Option<usize>,

    /// Track currently selected (the one-off preview if one is loaded)
    pub track: Option<Track>,

    pub position: Duration,
    pub duration: Duration,
    pub is_scrubbing: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub history_len: usize,

    /// Whether the loaded track is a one-off outside the playlist
    pub one_off: bool,

    pub overlay: OverlaySnapshot,
}

impl TransportSnapshot {
    pub fn is_playing(&self) -> bool {
        self.phase == TransportPhase::Playing
    }

    pub fn is_loading(&self) -> bool {
        self.phase == TransportPhase::Loading
    }
}
