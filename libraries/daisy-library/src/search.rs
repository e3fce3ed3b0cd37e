//! Local search and result merging
//!
//! Local results are filtered synchronously from the playlist. Remote
//! results arrive later from a catalog client and are appended after the
//! local ones.

use daisy_core::{RemoteTrack, SearchResult, Track};

/// Minimum query length, exclusive, before a remote catalog is queried
pub const REMOTE_QUERY_MIN_CHARS: usize = 2;

/// Filter the playlist by a case-insensitive substring of title or artist
///
/// An empty query matches nothing. Results carry the playlist index so they
/// can be loaded directly.
pub fn filter_local(tracks: &[Track], query: &str) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    tracks
        .iter()
        .enumerate()
        .filter(|(_, track)| {
            track.title.to_lowercase().contains(&needle)
                || track.artist.to_lowercase().contains(&needle)
        })
        .map(|(index, track)| SearchResult::Local {
            index,
            track: track.clone(),
        })
        .collect()
}

/// Whether a query is long enough to send to a remote catalog
pub fn should_search_remote(query: &str) -> bool {
    query.chars().count() > REMOTE_QUERY_MIN_CHARS
}

/// Combine local and remote results, local first
///
/// Each group keeps its own order.
pub fn merge(local: Vec<SearchResult>, remote: Vec<RemoteTrack>) -> Vec<SearchResult> {
    let mut results = local;
    results.extend(remote.into_iter().map(SearchResult::Remote));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use daisy_core::CatalogProvider;

    fn remote(id: &str) -> RemoteTrack {
        RemoteTrack {
            id: id.to_string(),
            title: format!("Remote {id}"),
            artist: "Someone".to_string(),
            album: None,
            artwork: None,
            preview: None,
            duration: None,
            provider: CatalogProvider::AppleMusic,
        }
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(filter_local(&catalog::default_playlist(), "").is_empty());
    }

    #[test]
    fn matches_title_or_artist_case_insensitively() {
        let tracks = catalog::default_playlist();

        let by_title = filter_local(&tracks, "DRESS");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title(), "The Dress");

        let by_artist = filter_local(&tracks, "leon");
        assert_eq!(by_artist.len(), 1);
        assert!(matches!(by_artist[0], SearchResult::Local { index: 2, .. }));
    }

    #[test]
    fn remote_threshold() {
        assert!(!should_search_remote("da"));
        assert!(should_search_remote("dai"));
        // Counted in characters, not bytes
        assert!(!should_search_remote("é€"));
    }

    #[test]
    fn merge_puts_local_first() {
        let tracks = catalog::default_playlist();
        let local = filter_local(&tracks, "t");
        let local_len = local.len();

        let merged = merge(local, vec![remote("a"), remote("b")]);
        assert_eq!(merged.len(), local_len + 2);
        assert!(merged[..local_len].iter().all(SearchResult::is_local));
        assert_eq!(merged[local_len].title(), "Remote a");
        assert_eq!(merged[local_len + 1].title(), "Remote b");
    }
}
