/// Command line commands
pub mod account;
pub mod color;
pub mod iso;
pub mod library;
pub mod play;
pub mod search;
pub mod spotify;

use crate::app::App;
use clap::Subcommand;
use daisy_playback::{PlaybackEvent, PlayerHandle, TransportSnapshot};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign up, or sign out
    Account {
        #[command(subcommand)]
        action: account::AccountAction,
    },

    /// Play a track from the default playlist
    Play(play::PlayArgs),

    /// Audition the stems of the ISO track at the same playhead
    Iso(iso::IsoArgs),

    /// Search the local catalog and, optionally, Apple Music
    Search(search::SearchArgs),

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: library::FavoritesAction,
    },

    /// Manage named playlists
    Playlist {
        #[command(subcommand)]
        action: library::PlaylistAction,
    },

    /// Show or change the background color preference
    Color(color::ColorArgs),

    /// Spotify account and remote playback
    Spotify {
        #[command(subcommand)]
        action: spotify::SpotifyAction,
    },
}

/// Run a parsed command against the application services
pub async fn dispatch(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Account { action } => account::run(app, action).await?,
        Commands::Play(args) => {
            let snapshot = play::run(app, args).await?;
            print_snapshot(&snapshot);
        }
        Commands::Iso(args) => {
            let snapshot = iso::run(app, args).await?;
            print_snapshot(&snapshot);
        }
        Commands::Search(args) => {
            search::run(app, args).await?;
        }
        Commands::Favorites { action } => library::favorites(app, action).await?,
        Commands::Playlist { action } => library::playlist(app, action).await?,
        Commands::Color(args) => {
            let color = color::run(app, args).await?;
            println!("Background color: {color}");
        }
        Commands::Spotify { action } => spotify::run(app, action).await?,
    }
    Ok(())
}

/// Log every player event until the service shuts down
pub fn spawn_event_logger(player: &PlayerHandle) -> JoinHandle<()> {
    let mut events = player.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event @ PlaybackEvent::Error { .. }) => warn!(?event, "Player error"),
                Ok(PlaybackEvent::PositionChanged { .. }) => {}
                Ok(event) => info!(?event, "Player event"),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event logger lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Poll the transport until it is playing or `timeout` elapses
pub async fn wait_for_playing(
    player: &PlayerHandle,
    timeout: Duration,
) -> anyhow::Result<TransportSnapshot> {
    let deadline = Instant::now() + timeout;
    loop {
        let snapshot = player.snapshot().await?;
        if snapshot.is_playing() {
            return Ok(snapshot);
        }
        if Instant::now() >= deadline {
            anyhow::bail!("Track did not start within {:?} ({:?})", timeout, snapshot.phase);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

pub fn print_snapshot(snapshot: &TransportSnapshot) {
    match &snapshot.track {
        Some(track) => println!("{} - {}", track.title, track.artist),
        None => println!("Nothing loaded"),
    }
    println!(
        "  {:?}  {} / {}  shuffle: {}  repeat: {:?}",
        snapshot.phase,
        format_time(snapshot.position),
        format_time(snapshot.duration),
        if snapshot.shuffle { "on" } else { "off" },
        snapshot.repeat,
    );
    if snapshot.overlay.active {
        println!(
            "  ISO: {} (main paused at {})",
            snapshot.overlay.active_alternate.as_deref().unwrap_or("-"),
            format_time(snapshot.overlay.paused_position),
        );
    }
}

/// Format a duration as `m:ss`
pub fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
