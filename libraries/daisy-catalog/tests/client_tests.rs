//! Tests for the catalog clients.
//!
//! These tests use mock servers to verify client behavior without
//! requiring real Spotify or Apple Music credentials.

use chrono::{Duration as ChronoDuration, Utc};
use daisy_catalog::{
    AppleMusicClient, AppleMusicConfig, AuthError, CatalogError, CatalogSearch, SearchType,
    SpotifyClient, SpotifyConfig, TokenSet,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tokens(refresh: Option<&str>) -> TokenSet {
    TokenSet {
        access_token: "access-1".to_string(),
        refresh_token: refresh.map(str::to_string),
        expires_at: Utc::now() + ChronoDuration::hours(1),
    }
}

async fn spotify(server: &MockServer) -> SpotifyClient {
    let config = SpotifyConfig {
        client_id: "client-123".to_string(),
        redirect_uri: "daisy://callback".to_string(),
        api_base: format!("{}/v1", server.uri()),
        auth_base: server.uri(),
    };
    SpotifyClient::new(config).expect("valid config")
}

async fn connected_spotify(server: &MockServer) -> SpotifyClient {
    let client = spotify(server).await;
    client.set_tokens(tokens(Some("refresh-1"))).await;
    client
}

fn track_json(id: &str, name: &str, preview: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "uri": format!("spotify:track:{id}"),
        "duration_ms": 180000,
        "preview_url": preview,
        "artists": [{ "id": "a1", "name": "Tems" }],
        "album": {
            "id": "al1",
            "name": "For Broken Ears",
            "images": [{ "url": "https://i.scdn.co/image/1", "height": 640, "width": 640 }]
        }
    })
}

// =============================================================================
// Spotify Authorization
// =============================================================================

mod spotify_auth {
    use super::*;

    #[tokio::test]
    async fn test_exchange_code_sends_verifier() {
        let server = MockServer::start().await;
        let client = spotify(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth-code"))
            .and(body_string_contains("code_verifier="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-1",
                "token_type": "Bearer",
                "scope": "user-read-email",
                "expires_in": 3600,
                "refresh_token": "refresh-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        client.authorize_url().await.unwrap();
        let tokens = client.exchange_code("auth-code").await.unwrap();

        assert_eq!(tokens.access_token, "access-1");
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-1"));
        assert!(client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_exchange_without_authorize_is_rejected() {
        let server = MockServer::start().await;
        let client = spotify(&server).await;

        let result = client.exchange_code("auth-code").await;
        assert!(matches!(
            result,
            Err(CatalogError::Auth(AuthError::Rejected(_)))
        ));
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-2",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        let tokens = client.refresh().await.unwrap();
        assert_eq!(tokens.access_token, "access-2");
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn test_rejected_refresh_clears_session() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#),
            )
            .mount(&server)
            .await;

        let result = client.refresh().await;
        assert!(matches!(
            result,
            Err(CatalogError::Auth(AuthError::Rejected(_)))
        ));
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token() {
        let server = MockServer::start().await;
        let client = spotify(&server).await;
        client.set_tokens(tokens(None)).await;

        assert!(matches!(
            client.refresh().await,
            Err(CatalogError::Auth(AuthError::MissingToken))
        ));
    }

    #[tokio::test]
    async fn test_logout_forgets_tokens() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        client.logout().await;
        assert!(!client.is_authenticated().await);
        assert!(client.tokens().await.is_none());
    }
}

// =============================================================================
// Spotify Web API
// =============================================================================

mod spotify_api {
    use super::*;

    #[tokio::test]
    async fn test_search_tracks() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("authorization", "Bearer access-1"))
            .and(query_param("q", "crazy tings"))
            .and(query_param("type", "track"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tracks": {
                    "items": [
                        track_json("t1", "Crazy Tings", Some("https://p.scdn.co/mp3-preview/1")),
                        track_json("t2", "Crazy Tings (Live)", None)
                    ],
                    "total": 2,
                    "limit": 10,
                    "offset": 0
                }
            })))
            .mount(&server)
            .await;

        let response = client
            .search("crazy tings", SearchType::Track, 10)
            .await
            .unwrap();
        assert_eq!(response.tracks.as_ref().unwrap().items.len(), 2);

        let remote = client.search_tracks("crazy tings", 10).await.unwrap();
        assert_eq!(remote[0].title, "Crazy Tings");
        assert_eq!(remote[0].artist, "Tems");
        assert!(remote[0].preview.is_some());
        assert!(remote[1].preview.is_none());
    }

    #[tokio::test]
    async fn test_search_limit_is_clamped() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client.search("x", SearchType::Album, 500).await.unwrap();
        assert!(response.albums.is_none());
    }

    #[tokio::test]
    async fn test_currently_playing_nothing() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        assert!(client.currently_playing().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_currently_playing_track() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "item": track_json("t1", "Crazy Tings", None),
                "is_playing": true,
                "progress_ms": 42000,
                "device": {
                    "id": "d1",
                    "is_active": true,
                    "name": "Kitchen",
                    "type": "Speaker",
                    "volume_percent": 40
                }
            })))
            .mount(&server)
            .await;

        let playing = client.currently_playing().await.unwrap().unwrap();
        assert!(playing.is_playing);
        assert_eq!(playing.progress_ms, Some(42000));
        assert_eq!(playing.item.unwrap().name, "Crazy Tings");
        assert_eq!(playing.device.unwrap().kind, "Speaker");
    }

    #[tokio::test]
    async fn test_expired_token_clears_session_without_retry() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/me/player/devices"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        // A silent refresh would hit this
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let result = client.devices().await;
        assert!(matches!(
            result,
            Err(CatalogError::Auth(AuthError::SessionExpired))
        ));
        assert!(!client.is_authenticated().await);

        let again = client.devices().await;
        assert!(matches!(
            again,
            Err(CatalogError::Auth(AuthError::MissingToken))
        ));
    }

    #[tokio::test]
    async fn test_remote_transport() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        Mock::given(method("PUT"))
            .and(path("/v1/me/player/play"))
            .and(query_param("device_id", "d1"))
            .and(body_string_contains("spotify:track:t1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v1/me/player/pause"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/me/player/next"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/me/player/previous"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client
            .play(Some("d1"), &["spotify:track:t1".to_string()])
            .await
            .unwrap();
        client.pause().await.unwrap();
        client.skip_next().await.unwrap();
        client.skip_previous().await.unwrap();
    }

    #[tokio::test]
    async fn test_devices_and_server_errors() {
        let server = MockServer::start().await;
        let client = connected_spotify(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/me/player/devices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "devices": [
                    { "id": "d1", "is_active": false, "name": "Phone", "type": "Smartphone", "volume_percent": null }
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let devices = client.devices().await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "Phone");

        match client.profile().await {
            Err(CatalogError::ServerError { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("Expected ServerError, got {:?}", other.map(|u| u.id)),
        }
    }
}

// =============================================================================
// Apple Music
// =============================================================================

mod apple_music {
    use super::*;

    async fn apple(server: &MockServer) -> AppleMusicClient {
        let client = AppleMusicClient::new(AppleMusicConfig {
            developer_token: Some("dev-token".to_string()),
            api_base: server.uri(),
            ..AppleMusicConfig::default()
        })
        .expect("valid config");
        client.authorize().await.unwrap();
        client
    }

    #[tokio::test]
    async fn test_search_parses_songs() {
        let server = MockServer::start().await;
        let client = apple(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/search"))
            .and(header("authorization", "Bearer dev-token"))
            .and(query_param("term", "daisies"))
            .and(query_param("types", "songs"))
            .and(query_param("limit", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": {
                    "songs": {
                        "data": [{
                            "id": "1440",
                            "type": "songs",
                            "attributes": {
                                "name": "Daisies",
                                "artistName": "Justin Bieber",
                                "albumName": "Swag",
                                "durationInMillis": 176000,
                                "artwork": { "url": "https://is1.example.com/{w}x{h}bb.jpg", "width": 3000, "height": 3000 },
                                "previews": [{ "url": "https://audio.example.com/daisies.m4a" }]
                            }
                        }, {
                            "id": "1441",
                            "type": "songs",
                            "attributes": { "name": "Daisies (Demo)", "artistName": "Justin Bieber" }
                        }]
                    }
                }
            })))
            .mount(&server)
            .await;

        let tracks = client
            .search_tracks("daisies", daisy_catalog::DEFAULT_SEARCH_LIMIT)
            .await
            .unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(
            tracks[0].artwork.as_ref().unwrap().as_str(),
            "https://is1.example.com/300x300bb.jpg"
        );
        assert!(tracks[0].preview.is_some());
        assert!(tracks[1].preview.is_none());
        assert!(tracks[1].artwork.is_none());
    }

    #[tokio::test]
    async fn test_search_without_songs_section() {
        let server = MockServer::start().await;
        let client = apple(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": {}
            })))
            .mount(&server)
            .await;

        assert!(client.search_tracks("zzz", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_token_revokes_authorization() {
        let server = MockServer::start().await;
        let client = apple(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/search"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client.search_tracks("daisies", 25).await;
        assert!(matches!(
            result,
            Err(CatalogError::Auth(AuthError::SessionExpired))
        ));
        assert!(!client.is_authorized().await);
    }
}
