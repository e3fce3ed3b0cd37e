//! Platform audio primitive
//!
//! Abstracts the platform decoder/player (AVPlayer, ExoPlayer, a desktop
//! decoder). The transport never talks to it directly; directives go through
//! [`PlaybackAdapter`](crate::adapter::PlaybackAdapter).

use crate::error::Result;
use async_trait::async_trait;
use daisy_core::AudioSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque reference to a loaded, decoded audio resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Options applied when a source is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Initial playhead
    pub start_at: Duration,

    /// Start playing as soon as the source is ready
    pub autoplay: bool,
}

/// Status reported by a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandleStatus {
    pub position: Duration,

    /// Zero until the decoder knows the length
    pub duration: Duration,

    pub is_playing: bool,
}

/// Platform audio backend
///
/// Implementations must be usable from several tasks at once: loads run on
/// spawned tasks while the player service keeps polling.
///
/// Once a handle is released, every operation on it except `release` fails
/// with [`PlaybackError::HandleReleased`](crate::error::PlaybackError::HandleReleased).
/// Releasing an unknown or already released handle succeeds and does nothing.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Load and decode a source
    ///
    /// # Returns
    /// * `Ok(handle)` - Handle ready for playback
    /// * `Err(PlaybackError::Load)` - Source unreachable or undecodable
    async fn load(&self, source: &AudioSource, options: LoadOptions) -> Result<HandleId>;

    /// Start or resume playback
    async fn play(&self, handle: HandleId) -> Result<()>;

    /// Pause playback, holding the position
    async fn pause(&self, handle: HandleId) -> Result<()>;

    /// Move the playhead
    async fn seek(&self, handle: HandleId, position: Duration) -> Result<()>;

    /// Free platform resources
    ///
    /// Idempotent.
    async fn release(&self, handle: HandleId) -> Result<()>;

    /// Report position, duration and play state
    ///
    /// Must not block.
    fn poll_status(&self, handle: HandleId) -> Result<HandleStatus>;
}
