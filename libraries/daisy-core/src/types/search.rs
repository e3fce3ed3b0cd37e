/// Search result types shared by the local library and remote catalogs
use crate::types::{Artwork, AudioSource, Track, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Remote catalog a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogProvider {
    /// Spotify Web API
    Spotify,

    /// Apple Music catalog API
    AppleMusic,
}

impl fmt::Display for CatalogProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spotify => write!(f, "Spotify"),
            Self::AppleMusic => write!(f, "Apple Music"),
        }
    }
}

/// Track returned by a remote catalog search
///
/// Remote tracks have no stable playlist index. Only the preview clip (if
/// any) is playable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTrack {
    /// Provider-specific id
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    pub album: Option<String>,

    /// Artwork URL, already expanded to a concrete size
    pub artwork: Option<Url>,

    /// Short preview clip (typically 30 seconds)
    pub preview: Option<Url>,

    /// Full track duration as reported by the catalog
    pub duration: Option<Duration>,

    /// Catalog the track came from
    pub provider: CatalogProvider,
}

impl RemoteTrack {
    /// Build a one-off playable track from the preview clip
    ///
    /// Returns `None` when the catalog did not provide a preview.
    pub fn preview_track(&self) -> Option<Track> {
        let preview = self.preview.clone()?;
        let mut track = Track::new(
            TrackId::new(format!("{}:{}", provider_prefix(self.provider), self.id)),
            self.title.clone(),
            self.artist.clone(),
            AudioSource::remote(preview),
        );
        track.album.clone_from(&self.album);
        track.artwork = self.artwork.clone().map(Artwork::Remote);
        Some(track)
    }
}

fn provider_prefix(provider: CatalogProvider) -> &'static str {
    match provider {
        CatalogProvider::Spotify => "spotify",
        CatalogProvider::AppleMusic => "apple-music",
    }
}

/// A selectable search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SearchResult {
    /// Track from the local catalog, addressable by playlist index
    Local { index: usize, track: Track },

    /// Track from a remote catalog
    Remote(RemoteTrack),
}

impl SearchResult {
    /// Title for display
    pub fn title(&self) -> &str {
        match self {
            Self::Local { track, .. } => &track.title,
            Self::Remote(remote) => &remote.title,
        }
    }

    /// Artist for display
    pub fn artist(&self) -> &str {
        match self {
            Self::Local { track, .. } => &track.artist,
            Self::Remote(remote) => &remote.artist,
        }
    }

    /// Label of the collection the result came from
    pub fn source_label(&self) -> String {
        match self {
            Self::Local { .. } => "Local Library".to_string(),
            Self::Remote(remote) => remote.provider.to_string(),
        }
    }

    /// Check if the result is from the local catalog
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }
}
