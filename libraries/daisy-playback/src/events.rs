//! Playback events
//!
//! Emitted by the manager and broadcast by the player service so UIs can
//! re-render:
//! - Phase changes (loading/playing/paused/idle)
//! - Track changes
//! - Position updates (one per status poll)
//! - Mode changes (shuffle, repeat, ISO)
//! - One-shot errors

use crate::types::{RepeatMode, TransportPhase};
use daisy_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport phase changed
    StateChanged { phase: TransportPhase },

    /// A different track was selected for loading
    TrackChanged {
        /// Playlist index, `None` for a one-off preview
        index: Option<usize>,
        track_id: TrackId,
    },

    /// Position update from a status poll or seek
    PositionChanged { position_ms: u64, duration_ms: u64 },

    /// Sequential "next" wrapped with repeat off; transport paused at the end
    ReachedEnd { index: usize },

    ShuffleChanged { enabled: bool },

    RepeatChanged { mode: RepeatMode },

    /// ISO overlay entered, switched source, or exited
    OverlayChanged {
        active: bool,
        alternate: Option<String>,
    },

    /// Non-fatal failure, shown once
    Error { message: String },
}

impl PlaybackEvent {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
