//! Local asset catalog
//!
//! Tracks bundled with the application. The list is fixed at compile time and
//! its order is the default playlist order.

use crate::error::{LibraryError, Result};
use daisy_core::{Artwork, AudioSource, Track, TrackId};

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    artist: &'static str,
    audio: &'static str,
    artwork: Option<&'static str>,
    alternates: &'static [(&'static str, &'static str, &'static str)],
}

/// Stem renderings shipped for the ISO screen
const DAISIES_STEMS: &[(&str, &str, &str)] = &[
    ("beat", "Beat", "audio/beat.mp3"),
    ("bass", "Bass", "audio/bass.mp3"),
    ("bed", "Bed", "audio/bed.mp3"),
    ("vox", "Vox", "audio/vox.mp3"),
];

const LOCAL_TRACKS: &[CatalogEntry] = &[
    CatalogEntry {
        id: "1",
        title: "Crazy Tings",
        artist: "Tems",
        audio: "audio/crazy-tings.mp3",
        artwork: Some("images/swag.jpg"),
        alternates: &[],
    },
    CatalogEntry {
        id: "2",
        title: "The Dress",
        artist: "Dijon",
        audio: "audio/the-dress.mp3",
        artwork: Some("images/dijon.jpg"),
        alternates: &[],
    },
    CatalogEntry {
        id: "3",
        title: "Mutt",
        artist: "Leon Thomas",
        audio: "audio/mutt.mp3",
        artwork: Some("images/mutt.jpg"),
        alternates: &[],
    },
    CatalogEntry {
        id: "daisies",
        title: "Daisies",
        artist: "Justin Bieber",
        audio: "audio/sample.mp3",
        artwork: None,
        alternates: DAISIES_STEMS,
    },
];

impl CatalogEntry {
    fn to_track(&self) -> Track {
        let mut track = Track::new(
            self.id,
            self.title,
            self.artist,
            AudioSource::asset(self.audio),
        );
        if let Some(artwork) = self.artwork {
            track = track.with_artwork(Artwork::Asset(artwork.into()));
        }
        for (id, label, audio) in self.alternates {
            track = track.with_alternate(*id, *label, AudioSource::asset(*audio));
        }
        track
    }
}

/// Default playlist: every bundled track in catalog order
pub fn default_playlist() -> Vec<Track> {
    LOCAL_TRACKS.iter().map(CatalogEntry::to_track).collect()
}

/// Id of the track the ISO screen opens with
pub fn iso_track_id() -> TrackId {
    TrackId::new("daisies")
}

/// Look up a bundled track by id
pub fn find(id: &str) -> Result<Track> {
    LOCAL_TRACKS
        .iter()
        .find(|entry| entry.id == id)
        .map(CatalogEntry::to_track)
        .ok_or_else(|| LibraryError::UnknownTrack(id.to_string()))
}

/// Playlist index of a bundled track
pub fn index_of(id: &str) -> Option<usize> {
    LOCAL_TRACKS.iter().position(|entry| entry.id == id)
}
