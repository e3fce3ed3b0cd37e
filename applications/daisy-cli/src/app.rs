/// Service wiring
///
/// Every long-lived service is built once here and handed to the commands.
use crate::account::LocalAccounts;
use crate::config::AppConfig;
use anyhow::Context;
use daisy_catalog::{AppleMusicClient, SpotifyClient, TokenSet};
use daisy_core::{SessionService, Track};
use daisy_library::catalog;
use daisy_playback::{PlaybackManager, PlayerHandle, PlayerService, SimulatedBackend};
use daisy_storage::preferences;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Preference key holding the Spotify session
pub const KEY_SPOTIFY_TOKENS: &str = "spotifyTokens";

pub struct App {
    pub config: AppConfig,
    pub pool: SqlitePool,
    pub tracks: Vec<Track>,
    pub backend: Arc<SimulatedBackend>,
    pub player: PlayerHandle,
    pub apple: AppleMusicClient,
    pub spotify: SpotifyClient,
    pub session: SessionService,
    player_task: JoinHandle<()>,
}

impl App {
    /// Open the database and start every service
    pub async fn bootstrap(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let pool = daisy_storage::create_pool(&config.storage.database_url)
            .await
            .with_context(|| format!("opening {}", config.storage.database_url))?;
        daisy_storage::run_migrations(&pool).await?;
        info!("Database connected");

        Self::with_pool(config, pool).await
    }

    /// Start every service on an existing pool
    pub async fn with_pool(config: AppConfig, pool: SqlitePool) -> anyhow::Result<Self> {
        let tracks = catalog::default_playlist();

        let backend = Arc::new(
            SimulatedBackend::new()
                .with_latency(config.simulation.load_latency())
                .with_default_duration(config.simulation.track_duration()),
        );
        let manager = PlaybackManager::new(tracks.clone(), config.playback.clone());
        let (player, player_task) = PlayerService::spawn(manager, backend.clone());
        info!("Player started with {} tracks", tracks.len());

        let apple = AppleMusicClient::new(config.apple.clone())?;
        if config.apple.developer_token.is_some() {
            if let Err(e) = apple.authorize().await {
                warn!(error = %e, "Apple Music unavailable");
            }
        }

        let spotify = SpotifyClient::new(config.spotify.clone())?;
        if let Some(json) = preferences::get_preference(&pool, KEY_SPOTIFY_TOKENS).await? {
            match serde_json::from_str::<TokenSet>(&json) {
                Ok(tokens) => spotify.set_tokens(tokens).await,
                Err(e) => warn!(error = %e, "Ignoring stored Spotify session"),
            }
        }

        let session = SessionService::new(Arc::new(LocalAccounts::new(pool.clone())));
        session.restore().await;

        Ok(Self {
            config,
            pool,
            tracks,
            backend,
            player,
            apple,
            spotify,
            session,
            player_task,
        })
    }

    /// Write the Spotify session to storage, or clear it if disconnected
    pub async fn persist_spotify_session(&self) -> anyhow::Result<()> {
        match self.spotify.tokens().await {
            Some(tokens) => {
                let json = serde_json::to_string(&tokens)?;
                preferences::set_preference(&self.pool, KEY_SPOTIFY_TOKENS, &json).await?;
            }
            None => preferences::delete_preference(&self.pool, KEY_SPOTIFY_TOKENS).await?,
        }
        Ok(())
    }

    /// Fail unless someone is signed in
    ///
    /// Gates every command that drives the local player.
    pub async fn require_session(&self) -> anyhow::Result<()> {
        if !self.session.is_signed_in().await {
            anyhow::bail!("Not signed in. Run `daisy account sign-in` first");
        }
        Ok(())
    }

    /// Stop the player, releasing every audio handle, and close the database
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.player.shutdown().await?;
        self.player_task.await?;
        self.pool.close().await;
        info!("Shut down");
        Ok(())
    }
}
