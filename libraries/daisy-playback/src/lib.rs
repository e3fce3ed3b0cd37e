//! Daisy Player - Playback Management
//!
//! This crate provides:
//! - Playback adapter over a platform audio primitive (single active handle)
//! - Transport state machine (play/pause/seek/scrub/next/previous)
//! - Shuffle by index with bounded history, repeat modes (Off, All, One)
//! - ISO overlay: audition alternate renderings at the main track's playhead
//! - Single-writer async player service with event broadcast
//! - Search result to transport bridge
//!
//! # Architecture
//!
//! [`PlaybackManager`] is sans-IO: every operation returns [`Directive`]s for
//! a driver to execute. [`PlayerService`] is the driver used in practice. It
//! owns the manager and a [`PlaybackAdapter`], and serializes user commands,
//! status polls and load completions through one queue.
//!
//! Platform-specific audio is provided via the [`AudioBackend`] trait.
//! [`SimulatedBackend`] stands in for it in headless runs and tests.
//!
//! # Example: Driving the manager by hand
//!
//! ```rust
//! use daisy_core::{AudioSource, Track};
//! use daisy_playback::{Directive, HandleId, PlaybackConfig, PlaybackManager};
//!
//! let tracks = vec![
//!     Track::new("1", "Crazy Tings", "Tems", AudioSource::asset("audio/1.mp3")),
//!     Track::new("2", "The Dress", "Dijon", AudioSource::asset("audio/2.mp3")),
//! ];
//! let mut manager = PlaybackManager::new(tracks, PlaybackConfig::default());
//!
//! let directives = manager.load_track(0).unwrap();
//! let Some(Directive::Load(request)) = directives.last() else {
//!     unreachable!()
//! };
//!
//! // Platform loads the source, then reports back
//! manager.complete_load(request.token, Ok(HandleId(1)));
//! assert!(manager.is_playing());
//! ```
//!
//! # Example: Service with the simulated backend
//!
//! ```rust,no_run
//! use daisy_playback::{PlaybackConfig, PlaybackManager, PlayerService, SimulatedBackend};
//! use std::sync::Arc;
//!
//! # async fn run() -> daisy_playback::Result<()> {
//! let manager = PlaybackManager::new(Vec::new(), PlaybackConfig::default());
//! let (player, task) = PlayerService::spawn(manager, Arc::new(SimulatedBackend::new()));
//!
//! let mut events = player.subscribe();
//! player.load_track(0).await.ok();
//! player.shutdown().await?;
//! # let _ = (events.try_recv(), task);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod backend;
pub mod bridge;
mod error;
pub mod events;
mod history;
pub mod manager;
pub mod overlay;
mod playlist;
pub mod service;
mod shuffle;
pub mod sim;
pub mod types;

// Public exports
pub use adapter::PlaybackAdapter;
pub use backend::{AudioBackend, HandleId, HandleStatus, LoadOptions};
pub use bridge::{BridgeError, FallbackChoice};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::History;
pub use manager::{Directive, LoadRequest, LoadTarget, LoadToken, PlaybackManager};
pub use playlist::Playlist;
pub use service::{PlayerHandle, PlayerService, TransportCommand};
pub use sim::SimulatedBackend;
pub use types::{
    OverlaySnapshot, PlaybackConfig, RepeatMode, TransportPhase, TransportSnapshot,
};
