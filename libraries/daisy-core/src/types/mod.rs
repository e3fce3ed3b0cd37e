//! Domain types

mod ids;
mod search;
mod track;

pub use ids::TrackId;
pub use search::{CatalogProvider, RemoteTrack, SearchResult};
pub use track::{AlternateSource, Artwork, AudioSource, Track};
