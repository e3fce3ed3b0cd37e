//! Daisy Player Catalog Clients
//!
//! HTTP clients for the remote catalogs the search screen can query.
//!
//! # Features
//!
//! - **Spotify**: PKCE authorization, token refresh, search, currently
//!   playing, remote transport control and devices
//! - **Apple Music**: developer-token catalog search with preview clips and
//!   expanded artwork URLs
//!
//! Both clients implement [`CatalogSearch`], which yields catalog-neutral
//! [`RemoteTrack`](daisy_core::RemoteTrack)s for the search bridge.
//!
//! # Example
//!
//! ```ignore
//! use daisy_catalog::{AppleMusicClient, AppleMusicConfig, CatalogSearch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppleMusicConfig {
//!         developer_token: Some(std::env::var("APPLE_MUSIC_TOKEN")?),
//!         ..AppleMusicConfig::default()
//!     };
//!     let client = AppleMusicClient::new(config)?;
//!     client.authorize().await?;
//!
//!     for track in client.search_tracks("daisies", 10).await? {
//!         println!("{} - {}", track.title, track.artist);
//!     }
//!     Ok(())
//! }
//! ```

mod apple;
mod error;
mod pkce;
mod spotify;
mod traits;
mod types;

pub use apple::{AppleMusicClient, DEFAULT_SEARCH_LIMIT};
pub use error::{AuthError, CatalogError, Result};
pub use pkce::PkceChallenge;
pub use spotify::SpotifyClient;
pub use traits::CatalogSearch;
pub use types::{
    expand_artwork, AppleArtwork, AppleMusicConfig, ApplePreview, AppleSong, CurrentlyPlaying,
    Device, Paging, SearchType, SongAttributes, SpotifyAlbum, SpotifyArtist, SpotifyConfig,
    SpotifyImage, SpotifySearchResponse, SpotifyTrack, SpotifyUser, TokenResponse, TokenSet,
    ARTWORK_SIZE, SPOTIFY_SCOPES,
};
