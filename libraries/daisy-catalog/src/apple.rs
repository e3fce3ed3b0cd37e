//! Apple Music catalog client.
//!
//! Catalog search only needs the developer token. Results carry 30-second
//! preview clips, which are the only part of a remote track the player can
//! play.

use crate::error::{AuthError, CatalogError, Result};
use crate::spotify::{normalize_base, server_error};
use crate::traits::CatalogSearch;
use crate::types::{AppleMusicConfig, AppleSearchResponse};
use async_trait::async_trait;
use daisy_core::RemoteTrack;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Default number of songs per search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 25;

/// Largest page the search endpoint accepts.
const MAX_SEARCH_LIMIT: u32 = 25;

/// Client for the Apple Music catalog API.
#[derive(Clone)]
pub struct AppleMusicClient {
    http: Client,
    config: Arc<AppleMusicConfig>,
    authorized: Arc<RwLock<bool>>,
}

impl AppleMusicClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AppleMusicConfig) -> Result<Self> {
        let config = AppleMusicConfig {
            api_base: normalize_base(&config.api_base)?,
            ..config
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("DaisyPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            authorized: Arc::new(RwLock::new(false)),
        })
    }

    /// Connect to the catalog.
    ///
    /// Fails when no developer token is configured.
    pub async fn authorize(&self) -> Result<()> {
        self.developer_token()?;
        *self.authorized.write().await = true;
        info!("Apple Music catalog access authorized");
        Ok(())
    }

    /// Disconnect from the catalog.
    pub async fn unauthorize(&self) {
        *self.authorized.write().await = false;
    }

    /// Check if [`authorize`](Self::authorize) succeeded and has not been
    /// revoked.
    pub async fn is_authorized(&self) -> bool {
        *self.authorized.read().await
    }

    /// Search catalog songs.
    ///
    /// Returns nothing when not authorized. `limit` is clamped to 1..=25.
    pub async fn search_songs(&self, query: &str, limit: u32) -> Result<Vec<RemoteTrack>> {
        if !self.is_authorized().await {
            debug!("Apple Music search skipped: not authorized");
            return Ok(Vec::new());
        }
        let token = self.developer_token()?;
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);

        let url = format!(
            "{}/v1/catalog/{}/search",
            self.config.api_base, self.config.storefront
        );
        debug!(url = %url, query = %query, "Searching Apple Music");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("term", query.to_string()),
                ("types", "songs".to_string()),
                ("limit", limit.to_string()),
                ("l", self.config.language.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = %status, "Apple Music rejected the developer token");
            *self.authorized.write().await = false;
            return Err(AuthError::SessionExpired.into());
        }
        if !status.is_success() {
            return Err(server_error(response).await);
        }

        let body: AppleSearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let songs = body.results.songs.map(|s| s.data).unwrap_or_default();
        debug!("Found {} Apple Music tracks", songs.len());
        Ok(songs.iter().map(|song| song.to_remote()).collect())
    }

    fn developer_token(&self) -> Result<&str> {
        match self.config.developer_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::MissingToken.into()),
        }
    }
}

#[async_trait]
impl CatalogSearch for AppleMusicClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<RemoteTrack>> {
        self.search_songs(query, limit).await
    }
}
