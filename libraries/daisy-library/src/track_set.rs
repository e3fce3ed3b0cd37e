//! Insertion-ordered set of tracks
//!
//! Backs both favorites and named playlist membership. Membership is keyed by
//! track id; the descriptor is kept so the set can be listed without a
//! catalog lookup.

use daisy_core::{Track, TrackId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Set of tracks with insertion-ordered iteration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Track>", into = "Vec<Track>")]
pub struct TrackSet {
    entries: IndexMap<TrackId, Track>,
}

/// Favorites are a plain track set
pub type Favorites = TrackSet;

impl TrackSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from persisted tracks, keeping the first of any duplicates
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut set = Self::new();
        for track in tracks {
            set.add(track);
        }
        set
    }

    /// Add a track
    ///
    /// Returns `false` if a track with the same id is already present. The
    /// existing entry keeps its position.
    pub fn add(&mut self, track: Track) -> bool {
        if self.entries.contains_key(&track.id) {
            return false;
        }
        debug!("Adding {} to track set", track.id);
        self.entries.insert(track.id.clone(), track);
        true
    }

    /// Remove a track by id
    ///
    /// Returns `false` if it was not present.
    pub fn remove(&mut self, id: &TrackId) -> bool {
        // shift_remove keeps the remaining entries in insertion order
        let removed = self.entries.shift_remove(id).is_some();
        if removed {
            debug!("Removed {} from track set", id);
        }
        removed
    }

    /// Add the track if absent, remove it if present
    ///
    /// Returns whether the track is a member afterwards.
    pub fn toggle(&mut self, track: Track) -> bool {
        if self.contains(&track.id) {
            self.remove(&track.id);
            false
        } else {
            self.add(track)
        }
    }

    /// Check membership
    pub fn contains(&self, id: &TrackId) -> bool {
        self.entries.contains_key(id)
    }

    /// Get a member by id
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.entries.get(id)
    }

    /// Iterate members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.entries.values()
    }

    /// Members in insertion order
    pub fn tracks(&self) -> Vec<Track> {
        self.entries.values().cloned().collect()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Track>> for TrackSet {
    fn from(tracks: Vec<Track>) -> Self {
        Self::from_tracks(tracks)
    }
}

impl From<TrackSet> for Vec<Track> {
    fn from(set: TrackSet) -> Self {
        set.entries.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a TrackSet {
    type Item = &'a Track;
    type IntoIter = indexmap::map::Values<'a, TrackId, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
