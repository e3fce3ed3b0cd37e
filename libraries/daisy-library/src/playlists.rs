//! Named playlist membership
//!
//! The built-in playlists each hold an insertion-ordered [`TrackSet`] with
//! the same add/remove semantics as favorites.

use crate::error::LibraryError;
use crate::track_set::TrackSet;
use daisy_core::{Track, TrackId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in playlist names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaylistName {
    #[serde(rename = "mondayMood")]
    MondayMood,

    #[serde(rename = "gym")]
    Gym,
}

impl PlaylistName {
    /// Every built-in playlist, in display order
    pub const ALL: [Self; 2] = [Self::MondayMood, Self::Gym];

    /// Stable key used for persistence
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MondayMood => "mondayMood",
            Self::Gym => "gym",
        }
    }

    /// Human-readable title
    pub fn title(self) -> &'static str {
        match self {
            Self::MondayMood => "Monday Mood",
            Self::Gym => "Gym",
        }
    }
}

impl fmt::Display for PlaylistName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaylistName {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mondayMood" | "monday-mood" => Ok(Self::MondayMood),
            "gym" => Ok(Self::Gym),
            other => Err(LibraryError::UnknownPlaylist(other.to_string())),
        }
    }
}

/// Membership of tracks in every built-in playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistMembership {
    lists: IndexMap<PlaylistName, TrackSet>,
}

impl Default for PlaylistMembership {
    fn default() -> Self {
        Self {
            lists: PlaylistName::ALL
                .into_iter()
                .map(|name| (name, TrackSet::new()))
                .collect(),
        }
    }
}

impl PlaylistMembership {
    /// Create membership with every playlist empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track to a playlist; duplicates are ignored
    pub fn add(&mut self, name: PlaylistName, track: Track) -> bool {
        self.list_mut(name).add(track)
    }

    /// Remove a track from a playlist
    pub fn remove(&mut self, name: PlaylistName, id: &TrackId) -> bool {
        self.list_mut(name).remove(id)
    }

    /// Toggle a track's membership in a playlist
    pub fn toggle(&mut self, name: PlaylistName, track: Track) -> bool {
        self.list_mut(name).toggle(track)
    }

    /// Check if a playlist contains a track
    pub fn contains(&self, name: PlaylistName, id: &TrackId) -> bool {
        self.lists.get(&name).is_some_and(|set| set.contains(id))
    }

    /// Tracks of one playlist in insertion order
    pub fn playlist(&self, name: PlaylistName) -> Option<&TrackSet> {
        self.lists.get(&name)
    }

    /// Replace one playlist wholesale (used when restoring from storage)
    pub fn set_playlist(&mut self, name: PlaylistName, set: TrackSet) {
        self.lists.insert(name, set);
    }

    /// Names of the playlists that contain a track
    pub fn playlists_containing(&self, id: &TrackId) -> Vec<PlaylistName> {
        self.lists
            .iter()
            .filter(|(_, set)| set.contains(id))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Iterate playlists in display order
    pub fn iter(&self) -> impl Iterator<Item = (PlaylistName, &TrackSet)> {
        self.lists.iter().map(|(name, set)| (*name, set))
    }

    fn list_mut(&mut self, name: PlaylistName) -> &mut TrackSet {
        self.lists.entry(name).or_default()
    }
}
