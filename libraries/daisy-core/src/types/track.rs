/// Track domain types
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where a track's audio comes from
///
/// Opaque to the playback core: only the audio backend interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum AudioSource {
    /// File bundled with the application, relative to the asset root
    Asset(PathBuf),

    /// Remote stream or preview clip
    Remote(Url),
}

impl AudioSource {
    /// Create a bundled asset source
    pub fn asset(path: impl Into<PathBuf>) -> Self {
        Self::Asset(path.into())
    }

    /// Create a remote source
    pub fn remote(url: Url) -> Self {
        Self::Remote(url)
    }

    /// Check if the source needs the network
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(path) => write!(f, "asset:{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Cover artwork reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum Artwork {
    /// Image bundled with the application
    Asset(PathBuf),

    /// Remote image (already expanded to a concrete size)
    Remote(Url),
}

/// Alternate rendering of a track (isolated stem, instrumental, ...)
///
/// Alternates share the main track's timeline, so they can be swapped at the
/// same playhead position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateSource {
    /// Identifier used to select the alternate (e.g. "beat", "vox")
    pub id: String,

    /// Display label
    pub label: String,

    /// Audio for this rendering
    pub source: AudioSource,
}

/// Track descriptor
///
/// Immutable once placed in a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier within a playlist
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    #[serde(default)]
    pub album: Option<String>,

    /// Audio location
    pub source: AudioSource,

    /// Cover artwork (optional)
    #[serde(default)]
    pub artwork: Option<Artwork>,

    /// Duration, if known before loading
    #[serde(default)]
    pub duration: Option<Duration>,

    /// Alternate renderings selectable in ISO mode
    #[serde(default)]
    pub alternates: Vec<AlternateSource>,
}

impl Track {
    /// Create a new track with no artwork, album, or alternates
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        source: AudioSource,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            source,
            artwork: None,
            duration: None,
            alternates: Vec::new(),
        }
    }

    /// Set the album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Set the cover artwork
    #[must_use]
    pub fn with_artwork(mut self, artwork: Artwork) -> Self {
        self.artwork = Some(artwork);
        self
    }

    /// Set a known duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Add an alternate rendering
    #[must_use]
    pub fn with_alternate(
        mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        source: AudioSource,
    ) -> Self {
        self.alternates.push(AlternateSource {
            id: id.into(),
            label: label.into(),
            source,
        });
        self
    }

    /// Look up an alternate rendering by id
    pub fn alternate(&self, id: &str) -> Option<&AlternateSource> {
        self.alternates.iter().find(|alt| alt.id == id)
    }
}
