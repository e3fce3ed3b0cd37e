//! Daisy Player Library
//!
//! Everything the player knows about music that is not playback:
//! - **Catalog**: the bundled tracks that make up the default playlist
//! - **Favorites**: an insertion-ordered [`TrackSet`]
//! - **Playlists**: membership in the built-in named playlists
//! - **Search**: local filtering and merging with remote catalog results
//!
//! Persistence lives in `daisy-storage`; these types are plain in-memory
//! state that serialize with `serde`.
//!
//! # Example
//!
//! ```rust
//! use daisy_library::{catalog, search, Favorites};
//!
//! let tracks = catalog::default_playlist();
//! let mut favorites = Favorites::new();
//! favorites.toggle(tracks[0].clone());
//!
//! let results = search::filter_local(&tracks, "tems");
//! assert_eq!(results.len(), 1);
//! assert!(favorites.contains(&tracks[0].id));
//! ```

pub mod catalog;
mod error;
pub mod playlists;
pub mod search;
mod track_set;

pub use error::{LibraryError, Result};
pub use playlists::{PlaylistMembership, PlaylistName};
pub use track_set::{Favorites, TrackSet};
