/// `daisy spotify`
///
/// The session is written back to storage after every action, so a
/// rejected token is forgotten as soon as the API reports it.
use crate::app::App;
use clap::{Subcommand, ValueEnum};
use daisy_catalog::SearchType;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Subcommand, Debug, Clone)]
pub enum SpotifyAction {
    /// Authorize with PKCE and store the session
    Login,

    /// Search the Spotify catalog
    Search {
        query: String,

        #[arg(short = 't', long = "type", value_enum, default_value_t = SearchKind::Track)]
        kind: SearchKind,

        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Show what the active device is playing
    NowPlaying,

    /// List devices available for remote playback
    Devices,

    /// Start or resume playback
    Play {
        /// Target device
        #[arg(short, long)]
        device: Option<String>,

        /// Track URIs to play
        uris: Vec<String>,
    },

    /// Pause the active device
    Pause,

    /// Skip to the next track
    Next,

    /// Skip to the previous track
    Previous,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Forget the stored session
    Logout,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Track,
    Artist,
    Album,
}

impl From<SearchKind> for SearchType {
    fn from(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Track => SearchType::Track,
            SearchKind::Artist => SearchType::Artist,
            SearchKind::Album => SearchType::Album,
        }
    }
}

pub async fn run(app: &App, action: SpotifyAction) -> anyhow::Result<()> {
    let result = execute(app, action).await;
    app.persist_spotify_session().await?;
    result
}

async fn execute(app: &App, action: SpotifyAction) -> anyhow::Result<()> {
    let spotify = &app.spotify;
    match action {
        SpotifyAction::Login => {
            let url = spotify.authorize_url().await?;
            println!("Open this URL and approve access:\n\n  {url}\n");
            println!("Paste the `code` parameter from the redirect:");

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let code = lines.next_line().await?.unwrap_or_default();
            spotify.exchange_code(code.trim()).await?;

            let user = spotify.profile().await?;
            println!(
                "Signed in as {}",
                user.display_name.as_deref().unwrap_or(&user.id)
            );
        }
        SpotifyAction::Search { query, kind, limit } => {
            let response = spotify.search(&query, kind.into(), limit).await?;
            for track in response.tracks.map(|p| p.items).unwrap_or_default() {
                println!("{} - {}  {}", track.name, track.artist_names(), track.uri);
            }
            for artist in response.artists.map(|p| p.items).unwrap_or_default() {
                println!("{}  spotify:artist:{}", artist.name, artist.id);
            }
            for album in response.albums.map(|p| p.items).unwrap_or_default() {
                println!("{}  spotify:album:{}", album.name, album.id);
            }
        }
        SpotifyAction::NowPlaying => match spotify.currently_playing().await? {
            Some(playing) => {
                let state = if playing.is_playing { "Playing" } else { "Paused" };
                match playing.item {
                    Some(track) => println!("{state}: {} - {}", track.name, track.artist_names()),
                    None => println!("{state}"),
                }
            }
            None => println!("Nothing playing"),
        },
        SpotifyAction::Devices => {
            for device in spotify.devices().await? {
                println!(
                    "{} {} ({}){}",
                    if device.is_active { "*" } else { " " },
                    device.name,
                    device.kind,
                    device.id.map(|id| format!("  {id}")).unwrap_or_default()
                );
            }
        }
        SpotifyAction::Play { device, uris } => spotify.play(device.as_deref(), &uris).await?,
        SpotifyAction::Pause => spotify.pause().await?,
        SpotifyAction::Next => spotify.skip_next().await?,
        SpotifyAction::Previous => spotify.skip_previous().await?,
        SpotifyAction::Refresh => {
            let tokens = spotify.refresh().await?;
            println!("Session renewed until {}", tokens.expires_at);
        }
        SpotifyAction::Logout => {
            spotify.logout().await;
            println!("Signed out");
        }
    }
    Ok(())
}
