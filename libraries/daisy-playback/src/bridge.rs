//! Search result to transport bridge
//!
//! Local results map to a playlist load. Remote results only carry a preview
//! clip, which plays as a one-off outside the playlist. A remote result
//! without a preview is an explicit choice for the caller, never a silent
//! fallback.

use crate::service::TransportCommand;
use daisy_core::{SearchResult, Track};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Remote result has no playable preview
    ///
    /// `local_fallback` is the playlist index of a matching local track, if
    /// there is one.
    #[error("No preview available for \"{title}\"")]
    PreviewUnavailable {
        title: String,
        local_fallback: Option<usize>,
    },
}

/// What the user chose after a preview turned out to be unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackChoice {
    /// Go back without playing anything
    Abandon,

    /// Play the suggested local match
    PlayLocal,
}

/// Map a selected search result to a transport command
pub fn resolve(result: &SearchResult, playlist: &[Track]) -> Result<TransportCommand, BridgeError> {
    match result {
        SearchResult::Local { index, .. } => Ok(TransportCommand::LoadTrack(*index)),
        SearchResult::Remote(remote) => match remote.preview_track() {
            Some(track) => Ok(TransportCommand::PlayOneOff(track)),
            None => Err(BridgeError::PreviewUnavailable {
                title: remote.title.clone(),
                local_fallback: local_match(playlist, &remote.title, &remote.artist),
            }),
        },
    }
}

/// Apply the user's choice to a failed resolution
pub fn resolve_fallback(error: &BridgeError, choice: FallbackChoice) -> Option<TransportCommand> {
    match (error, choice) {
        (
            BridgeError::PreviewUnavailable {
                local_fallback: Some(index),
                ..
            },
            FallbackChoice::PlayLocal,
        ) => Some(TransportCommand::LoadTrack(*index)),
        _ => None,
    }
}

fn local_match(playlist: &[Track], title: &str, artist: &str) -> Option<usize> {
    playlist.iter().position(|t| {
        t.title.eq_ignore_ascii_case(title) && t.artist.eq_ignore_ascii_case(artist)
    })
}
