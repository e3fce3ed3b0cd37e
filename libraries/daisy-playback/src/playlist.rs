//! Playlist store

use crate::error::{PlaybackError, Result};
use daisy_core::{Track, TrackId};

/// Ordered tracks plus the traversal cursor
///
/// Tracks are never reordered (shuffle picks indices instead), so
/// `original_order` always matches `tracks`. It is captured once and exposed
/// separately so callers can report the listing order independently of the
/// traversal.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    original_order: Vec<TrackId>,
    current_index: usize,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        let original_order = tracks.iter().map(|t| t.id.clone()).collect();
        Self {
            tracks,
            original_order,
            current_index: 0,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track ids in the order the playlist was built
    pub fn original_order(&self) -> &[TrackId] {
        &self.original_order
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Cursor position; `None` for an empty playlist
    pub fn current_index(&self) -> Option<usize> {
        (!self.tracks.is_empty()).then_some(self.current_index)
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    /// Move the cursor
    pub fn select(&mut self, index: usize) -> Result<&Track> {
        if self.tracks.is_empty() {
            return Err(PlaybackError::PlaylistEmpty);
        }
        let track = self
            .tracks
            .get(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.current_index = index;
        Ok(track)
    }

    /// Position of a track in listing order
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.original_order.iter().position(|t| t == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daisy_core::AudioSource;

    fn playlist() -> Playlist {
        Playlist::new(
            ["a", "b", "c"]
                .into_iter()
                .map(|id| Track::new(id, id.to_uppercase(), "Artist", AudioSource::asset(id)))
                .collect(),
        )
    }

    #[test]
    fn starts_at_first_track() {
        let playlist = playlist();
        assert_eq!(playlist.current_index(), Some(0));
        assert_eq!(playlist.current().unwrap().id.as_str(), "a");
    }

    #[test]
    fn empty_playlist_has_no_cursor() {
        let mut playlist = Playlist::new(Vec::new());
        assert_eq!(playlist.current_index(), None);
        assert!(matches!(playlist.select(0), Err(PlaybackError::PlaylistEmpty)));
    }

    #[test]
    fn select_out_of_bounds_keeps_cursor() {
        let mut playlist = playlist();
        playlist.select(2).unwrap();
        assert!(matches!(
            playlist.select(3),
            Err(PlaybackError::IndexOutOfBounds(3))
        ));
        assert_eq!(playlist.current_index(), Some(2));
    }

    #[test]
    fn original_order_is_listing_order() {
        let playlist = playlist();
        assert_eq!(playlist.position_of(&TrackId::new("c")), Some(2));
        assert_eq!(playlist.original_order().len(), 3);
    }
}
