//! Error types for playback management

use crate::backend::HandleId;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Source unreachable or undecodable
    #[error("Failed to load {location}: {reason}")]
    Load { location: String, reason: String },

    /// Operation on a handle that was already released
    #[error("Handle {0} was released")]
    HandleReleased(HandleId),

    /// Seek rejected by the backend
    #[error("Seek failed: {0}")]
    Seek(String),

    /// Any other backend failure
    #[error("Audio backend error: {0}")]
    Backend(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Playlist is empty
    #[error("Playlist is empty")]
    PlaylistEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Current track has no alternate with this id
    #[error("Unknown alternate source: {0}")]
    UnknownAlternate(String),

    /// Overlay command issued while not in ISO mode
    #[error("ISO mode is not active")]
    OverlayInactive,

    /// Player service task has stopped
    #[error("Player service stopped")]
    ServiceStopped,
}

impl PlaybackError {
    pub fn load(location: impl ToString, reason: impl Into<String>) -> Self {
        Self::Load {
            location: location.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
