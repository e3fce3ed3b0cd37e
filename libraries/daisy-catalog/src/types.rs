//! Configuration and wire types for the remote catalogs.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use daisy_core::{CatalogProvider, RemoteTrack};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

// =============================================================================
// Configuration
// =============================================================================

/// Scopes requested from Spotify.
pub const SPOTIFY_SCOPES: &[&str] = &[
    "user-read-email",
    "user-read-private",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "streaming",
    "playlist-read-private",
    "playlist-read-collaborative",
    "user-library-read",
    "user-top-read",
    "user-read-recently-played",
];

/// Spotify client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    /// Application client id
    pub client_id: String,

    /// Redirect URI registered for the application
    pub redirect_uri: String,

    /// Web API base (e.g., `https://api.spotify.com/v1`)
    pub api_base: String,

    /// Accounts service base (e.g., `https://accounts.spotify.com`)
    pub auth_base: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            redirect_uri: "daisy://callback".to_string(),
            api_base: "https://api.spotify.com/v1".to_string(),
            auth_base: "https://accounts.spotify.com".to_string(),
        }
    }
}

impl SpotifyConfig {
    /// Create a configuration for a client id with the public endpoints.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Self::default()
        }
    }
}

/// Apple Music client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppleMusicConfig {
    /// Developer token (a signed JWT issued outside the app)
    pub developer_token: Option<String>,

    /// Catalog storefront (e.g., "us")
    pub storefront: String,

    /// Response language
    pub language: String,

    /// API base (e.g., `https://api.music.apple.com`)
    pub api_base: String,
}

impl Default for AppleMusicConfig {
    fn default() -> Self {
        Self {
            developer_token: None,
            storefront: "us".to_string(),
            language: "en-us".to_string(),
            api_base: "https://api.music.apple.com".to_string(),
        }
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// Token response from the Spotify accounts service.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Tokens held by a connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// Build from a token response, keeping `previous_refresh` when the
    /// response does not rotate the refresh token.
    pub fn from_response(response: TokenResponse, previous_refresh: Option<String>) -> Self {
        let lifetime = ChronoDuration::seconds(i64::from(
            u32::try_from(response.expires_in).unwrap_or(u32::MAX),
        ));
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: Utc::now() + lifetime,
        }
    }

    /// Check if the access token has passed its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

// =============================================================================
// Spotify Web API
// =============================================================================

/// Object types accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Track,
    Artist,
    Album,
}

impl SearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Artist => "artist",
            Self::Album => "album",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: Option<SpotifyAlbum>,
}

impl SpotifyTrack {
    /// Comma-separated artist names.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Convert to a catalog-neutral search result.
    pub fn to_remote(&self) -> RemoteTrack {
        let album = self.album.as_ref();
        RemoteTrack {
            id: self.id.clone(),
            title: self.name.clone(),
            artist: self.artist_names(),
            album: album.map(|a| a.name.clone()),
            artwork: album
                .and_then(|a| a.images.first())
                .and_then(|image| Url::parse(&image.url).ok()),
            preview: self.preview_url.as_deref().and_then(|u| Url::parse(u).ok()),
            duration: Some(Duration::from_millis(self.duration_ms)),
            provider: CatalogProvider::Spotify,
        }
    }
}

/// One page of a paged result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifySearchResponse {
    #[serde(default)]
    pub tracks: Option<Paging<SpotifyTrack>>,
    #[serde(default)]
    pub artists: Option<Paging<SpotifyArtist>>,
    #[serde(default)]
    pub albums: Option<Paging<SpotifyAlbum>>,
}

/// A Spotify Connect device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub is_active: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub volume_percent: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DevicesResponse {
    pub devices: Vec<Device>,
}

/// Playback state of the user's active device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    pub item: Option<SpotifyTrack>,
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub device: Option<Device>,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

// =============================================================================
// Apple Music API
// =============================================================================

/// Artwork size substituted into Apple artwork templates.
pub const ARTWORK_SIZE: u32 = 300;

/// Substitute `{w}` and `{h}` in an Apple artwork URL template.
pub fn expand_artwork(template: &str, size: u32) -> String {
    let size = size.to_string();
    template.replace("{w}", &size).replace("{h}", &size)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppleArtwork {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplePreview {
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    pub name: String,
    pub artist_name: String,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub duration_in_millis: Option<u64>,
    #[serde(default)]
    pub artwork: Option<AppleArtwork>,
    #[serde(default)]
    pub previews: Vec<ApplePreview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppleSong {
    pub id: String,
    pub attributes: SongAttributes,
}

impl AppleSong {
    /// First preview clip with a usable URL.
    pub fn preview_url(&self) -> Option<Url> {
        self.attributes
            .previews
            .iter()
            .filter_map(|p| p.url.as_deref())
            .find_map(|u| Url::parse(u).ok())
    }

    /// Convert to a catalog-neutral search result.
    pub fn to_remote(&self) -> RemoteTrack {
        let attributes = &self.attributes;
        RemoteTrack {
            id: self.id.clone(),
            title: attributes.name.clone(),
            artist: attributes.artist_name.clone(),
            album: attributes.album_name.clone(),
            artwork: attributes
                .artwork
                .as_ref()
                .and_then(|a| Url::parse(&expand_artwork(&a.url, ARTWORK_SIZE)).ok()),
            preview: self.preview_url(),
            duration: attributes.duration_in_millis.map(Duration::from_millis),
            provider: CatalogProvider::AppleMusic,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AppleSongs {
    #[serde(default)]
    pub data: Vec<AppleSong>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AppleResults {
    #[serde(default)]
    pub songs: Option<AppleSongs>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AppleSearchResponse {
    #[serde(default)]
    pub results: AppleResults,
}
