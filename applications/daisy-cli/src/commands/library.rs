/// `daisy favorites` and `daisy playlist`
///
/// Tracks are addressed by their catalog id.
use crate::app::App;
use clap::Subcommand;
use daisy_core::TrackId;
use daisy_library::{catalog, PlaylistName, TrackSet};
use daisy_storage::{favorites, playlists};
use tracing::info;

#[derive(Subcommand, Debug, Clone)]
pub enum FavoritesAction {
    /// List favorites in the order they were added
    List,

    /// Add a track
    Add { id: String },

    /// Remove a track
    Remove { id: String },

    /// Add the track if absent, remove it otherwise
    Toggle { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistAction {
    /// List playlists, or the tracks of one playlist
    List { name: Option<PlaylistName> },

    /// Add a track to a playlist
    Add { name: PlaylistName, id: String },

    /// Remove a track from a playlist
    Remove { name: PlaylistName, id: String },
}

pub async fn favorites(app: &App, action: FavoritesAction) -> anyhow::Result<()> {
    match action {
        FavoritesAction::List => {}
        FavoritesAction::Add { id } => {
            let track = catalog::find(&id)?;
            favorites::add(&app.pool, &track).await?;
        }
        FavoritesAction::Remove { id } => {
            favorites::remove(&app.pool, &TrackId::new(id)).await?;
        }
        FavoritesAction::Toggle { id } => {
            let track = catalog::find(&id)?;
            let added = toggle_favorite(app, track).await?;
            println!("{}", if added { "Added" } else { "Removed" });
        }
    }

    print_set("Favorites", &favorites::load(&app.pool).await?);
    Ok(())
}

/// Flip a track's favorite status and persist it
///
/// Returns whether the track is a favorite afterwards.
pub async fn toggle_favorite(app: &App, track: daisy_core::Track) -> anyhow::Result<bool> {
    let mut set = favorites::load(&app.pool).await?;
    let added = set.toggle(track.clone());
    if added {
        favorites::add(&app.pool, &track).await?;
    } else {
        favorites::remove(&app.pool, &track.id).await?;
    }
    info!(track = %track.id, added, "Favorite toggled");
    Ok(added)
}

pub async fn playlist(app: &App, action: PlaylistAction) -> anyhow::Result<()> {
    match action {
        PlaylistAction::List { name: Some(name) } => {
            print_set(name.title(), &playlists::load_playlist(&app.pool, name).await?);
        }
        PlaylistAction::List { name: None } => {
            let membership = playlists::load(&app.pool).await?;
            for (name, set) in membership.iter() {
                println!("{} ({name}): {} tracks", name.title(), set.len());
            }
        }
        PlaylistAction::Add { name, id } => {
            let track = catalog::find(&id)?;
            playlists::add(&app.pool, name, &track).await?;
            print_set(name.title(), &playlists::load_playlist(&app.pool, name).await?);
        }
        PlaylistAction::Remove { name, id } => {
            playlists::remove(&app.pool, name, &TrackId::new(id)).await?;
            print_set(name.title(), &playlists::load_playlist(&app.pool, name).await?);
        }
    }
    Ok(())
}

fn print_set(title: &str, set: &TrackSet) {
    println!("{title}:");
    if set.is_empty() {
        println!("  (empty)");
    }
    for track in set {
        println!("  {:<8} {} - {}", track.id, track.title, track.artist);
    }
}
