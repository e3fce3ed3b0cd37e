//! Daisy Player Core
//!
//! Platform-agnostic domain types, collaborator traits, and error handling
//! shared by every Daisy Player crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `AudioSource`, `Artwork`, `SearchResult`
//! - **Collaborator Traits**: `AuthBackend` (the authentication service)
//! - **Session Gate**: `SessionService`, which owns the current session
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use daisy_core::{AudioSource, Track};
//!
//! let track = Track::new("daisies", "Daisies", "Justin Bieber", AudioSource::asset("audio/sample.mp3"))
//!     .with_alternate("beat", "Beat", AudioSource::asset("audio/beat.mp3"))
//!     .with_alternate("vox", "Vox", AudioSource::asset("audio/vox.mp3"));
//!
//! assert_eq!(track.alternates.len(), 2);
//! assert!(track.alternate("beat").is_some());
//! ```

#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use auth::{Credentials, Session, SessionService, SignUpRequest};
pub use error::{CoreError, Result};
pub use traits::AuthBackend;
pub use types::{
    AlternateSource, Artwork, AudioSource, CatalogProvider, RemoteTrack, SearchResult, Track,
    TrackId,
};
