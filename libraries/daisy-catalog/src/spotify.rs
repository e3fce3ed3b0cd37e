//! Spotify Web API client.
//!
//! Authorization uses the PKCE code flow. Tokens are only refreshed when
//! [`SpotifyClient::refresh`] is called: a 401 from the Web API clears the
//! session and surfaces [`AuthError::SessionExpired`] instead of retrying.

use crate::error::{AuthError, CatalogError, Result};
use crate::pkce::PkceChallenge;
use crate::traits::CatalogSearch;
use crate::types::{
    CurrentlyPlaying, Device, DevicesResponse, SearchType, SpotifyConfig, SpotifySearchResponse,
    SpotifyUser, TokenResponse, TokenSet, SPOTIFY_SCOPES,
};
use async_trait::async_trait;
use daisy_core::RemoteTrack;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Largest page the search endpoint accepts.
const MAX_SEARCH_LIMIT: u32 = 50;

/// Client for the Spotify accounts service and Web API.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Arc<SpotifyConfig>,
    tokens: Arc<RwLock<Option<TokenSet>>>,
    pending: Arc<RwLock<Option<PkceChallenge>>>,
}

impl SpotifyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SpotifyConfig) -> Result<Self> {
        let config = SpotifyConfig {
            api_base: normalize_base(&config.api_base)?,
            auth_base: normalize_base(&config.auth_base)?,
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
            tokens: Arc::new(RwLock::new(None)),
            pending: Arc::new(RwLock::new(None)),
        })
    }

    /// Restore tokens from a previous session.
    pub async fn set_tokens(&self, tokens: TokenSet) {
        *self.tokens.write().await = Some(tokens);
    }

    /// Current tokens, if connected.
    pub async fn tokens(&self) -> Option<TokenSet> {
        self.tokens.read().await.clone()
    }

    /// Check if the client holds an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    // ===== Authorization =====

    /// Start a PKCE authorization.
    ///
    /// Returns the URL to open in a browser. The verifier is kept until
    /// [`exchange_code`](Self::exchange_code) consumes it; calling this again
    /// replaces it.
    pub async fn authorize_url(&self) -> Result<Url> {
        if self.config.client_id.is_empty() {
            return Err(CatalogError::NotConfigured("spotify client id"));
        }

        let pkce = PkceChallenge::generate();
        let mut url = Url::parse(&format!("{}/authorize", self.config.auth_base))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("code_challenge_method", pkce.method())
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("scope", &SPOTIFY_SCOPES.join(" "));

        *self.pending.write().await = Some(pkce);
        Ok(url)
    }

    /// Exchange the authorization code from the redirect for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        let pkce = self
            .pending
            .write()
            .await
            .take()
            .ok_or_else(|| AuthError::Rejected("no authorization in progress".to_string()))?;

        let response = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("code_verifier", pkce.verifier.as_str()),
            ])
            .await?;

        let tokens = TokenSet::from_response(response, None);
        *self.tokens.write().await = Some(tokens.clone());
        info!("Connected to Spotify");
        Ok(tokens)
    }

    /// Trade the refresh token for a new access token.
    ///
    /// A rejected refresh clears the session.
    pub async fn refresh(&self) -> Result<TokenSet> {
        let refresh_token = self
            .tokens
            .read()
            .await
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
            .ok_or(AuthError::MissingToken)?;

        let result = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", self.config.client_id.as_str()),
            ])
            .await;

        match result {
            Ok(response) => {
                let tokens = TokenSet::from_response(response, Some(refresh_token));
                *self.tokens.write().await = Some(tokens.clone());
                debug!("Token refresh successful");
                Ok(tokens)
            }
            Err(err) => {
                if err.is_auth() {
                    *self.tokens.write().await = None;
                }
                Err(err)
            }
        }
    }

    /// Forget all tokens and any authorization in progress.
    pub async fn logout(&self) {
        *self.tokens.write().await = None;
        *self.pending.write().await = None;
        info!("Disconnected from Spotify");
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let url = format!("{}/api/token", self.config.auth_base);
        debug!(url = %url, "Requesting Spotify token");

        let response = self.http.post(&url).form(params).send().await?;
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                CatalogError::ParseError(format!("Failed to parse token response: {}", e))
            })
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Spotify token request rejected");
            Err(AuthError::Rejected(error_text).into())
        } else {
            Err(server_error(response).await)
        }
    }

    // ===== Web API =====

    /// Search the catalog.
    ///
    /// `limit` is clamped to 1..=50.
    pub async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        limit: u32,
    ) -> Result<SpotifySearchResponse> {
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        self.get_json(
            "/search",
            &[
                ("q", query.to_string()),
                ("type", search_type.as_str().to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// What the user's active device is playing; `None` when nothing is.
    pub async fn currently_playing(&self) -> Result<Option<CurrentlyPlaying>> {
        match self
            .send(Method::GET, "/me/player/currently-playing", &[], None)
            .await?
        {
            Some(response) => Ok(Some(parse_json(response).await?)),
            None => Ok(None),
        }
    }

    /// Start or resume playback on a device.
    pub async fn play(&self, device_id: Option<&str>, uris: &[String]) -> Result<()> {
        let query: Vec<(&str, String)> = device_id
            .map(|id| vec![("device_id", id.to_string())])
            .unwrap_or_default();
        let body = if uris.is_empty() {
            None
        } else {
            Some(serde_json::json!({ "uris": uris }))
        };

        self.send(Method::PUT, "/me/player/play", &query, body).await?;
        Ok(())
    }

    /// Pause playback on the active device.
    pub async fn pause(&self) -> Result<()> {
        self.send(Method::PUT, "/me/player/pause", &[], None).await?;
        Ok(())
    }

    /// Skip to the next track on the active device.
    pub async fn skip_next(&self) -> Result<()> {
        self.send(Method::POST, "/me/player/next", &[], None).await?;
        Ok(())
    }

    /// Skip to the previous track on the active device.
    pub async fn skip_previous(&self) -> Result<()> {
        self.send(Method::POST, "/me/player/previous", &[], None)
            .await?;
        Ok(())
    }

    /// Devices available for remote playback.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let response: DevicesResponse = self.get_json("/me/player/devices", &[]).await?;
        Ok(response.devices)
    }

    /// The signed-in user's profile.
    pub async fn profile(&self) -> Result<SpotifyUser> {
        self.get_json("/me", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        match self.send(Method::GET, path, query, None).await? {
            Some(response) => parse_json(response).await,
            None => Err(CatalogError::ParseError(format!(
                "Empty response from {}",
                path
            ))),
        }
    }

    /// Send an authenticated request.
    ///
    /// Returns `None` for 204 No Content.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Option<Response>> {
        let access_token = self
            .tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or(AuthError::MissingToken)?;

        let url = format!("{}{}", self.config.api_base, path);
        debug!(method = %method, url = %url, "Spotify request");

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(access_token)
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %url, "Spotify rejected the access token, clearing session");
            *self.tokens.write().await = None;
            return Err(AuthError::SessionExpired.into());
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(server_error(response).await);
        }
        Ok(Some(response))
    }
}

#[async_trait]
impl CatalogSearch for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<RemoteTrack>> {
        let response = self.search(query, SearchType::Track, limit).await?;
        Ok(response
            .tracks
            .map(|page| page.items.iter().map(|t| t.to_remote()).collect())
            .unwrap_or_default())
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| CatalogError::ParseError(e.to_string()))
}

pub(crate) async fn server_error(response: Response) -> CatalogError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    CatalogError::ServerError { status, message }
}

/// Validate a base URL and strip any trailing slash.
pub(crate) fn normalize_base(base: &str) -> Result<String> {
    if base.is_empty() {
        return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
    }
    let trimmed = base.trim_end_matches('/');
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CatalogError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    Url::parse(trimmed)?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_validation() {
        assert_eq!(
            normalize_base("https://api.spotify.com/v1/").unwrap(),
            "https://api.spotify.com/v1"
        );
        assert!(normalize_base("").is_err());
        assert!(normalize_base("ftp://example.com").is_err());
    }

    #[tokio::test]
    async fn authorize_url_carries_pkce_challenge() {
        let client = SpotifyClient::new(SpotifyConfig::new("client-123")).unwrap();
        let url = client.authorize_url().await.unwrap();

        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(url.path(), "/authorize");
        assert_eq!(pairs["client_id"], "client-123");
        assert_eq!(pairs["code_challenge_method"], "S256");
        assert!(pairs["scope"].contains("user-modify-playback-state"));

        let pending = client.pending.read().await.clone().unwrap();
        assert_eq!(pairs["code_challenge"], pending.challenge);
    }

    #[tokio::test]
    async fn authorize_requires_client_id() {
        let client = SpotifyClient::new(SpotifyConfig::default()).unwrap();
        assert!(matches!(
            client.authorize_url().await,
            Err(CatalogError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn requests_without_token_fail_fast() {
        let client = SpotifyClient::new(SpotifyConfig::new("client-123")).unwrap();
        assert!(matches!(
            client.pause().await,
            Err(CatalogError::Auth(AuthError::MissingToken))
        ));
    }
}
