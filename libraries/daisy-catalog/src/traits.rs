//! Seams shared by the catalog clients.

use crate::error::Result;
use async_trait::async_trait;
use daisy_core::RemoteTrack;

/// A remote catalog that can be searched for tracks.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Search for tracks matching `query`, returning at most `limit`.
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<RemoteTrack>>;
}
