/// Library-specific errors
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    /// Playlist name is not one of the built-in playlists
    #[error("Unknown playlist: {0}")]
    UnknownPlaylist(String),

    /// Track id not present in the local catalog
    #[error("Track not in local catalog: {0}")]
    UnknownTrack(String),
}
