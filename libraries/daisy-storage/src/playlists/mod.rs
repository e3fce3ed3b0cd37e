//! Playlist membership persistence

use crate::error::{Result, StorageError};
use daisy_core::{Track, TrackId};
use daisy_library::{PlaylistMembership, PlaylistName, TrackSet};
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// Load membership of every built-in playlist
pub async fn load(pool: &SqlitePool) -> Result<PlaylistMembership> {
    let rows = sqlx::query(
        "SELECT playlist, track_json FROM playlist_members ORDER BY playlist, position",
    )
    .fetch_all(pool)
    .await?;

    let mut membership = PlaylistMembership::new();
    for row in rows {
        let name: PlaylistName = row
            .get::<String, _>("playlist")
            .parse()
            .map_err(|e: daisy_library::LibraryError| StorageError::Corrupt {
                table: "playlist_members",
                reason: e.to_string(),
            })?;
        let track: Track = serde_json::from_str(&row.get::<String, _>("track_json"))?;
        membership.add(name, track);
    }

    Ok(membership)
}

/// Load a single playlist
pub async fn load_playlist(pool: &SqlitePool, name: PlaylistName) -> Result<TrackSet> {
    let rows = sqlx::query(
        "SELECT track_json FROM playlist_members WHERE playlist = ? ORDER BY position",
    )
    .bind(name.as_str())
    .fetch_all(pool)
    .await?;

    let tracks = rows
        .iter()
        .map(|row| serde_json::from_str::<Track>(&row.get::<String, _>("track_json")))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(TrackSet::from_tracks(tracks))
}

/// Append a track to a playlist; duplicates are ignored
pub async fn add(pool: &SqlitePool, name: PlaylistName, track: &Track) -> Result<()> {
    let json = serde_json::to_string(track)?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT OR IGNORE INTO playlist_members (playlist, track_id, position, track_json, added_at)
         VALUES (?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM playlist_members WHERE playlist = ?), ?, ?)",
    )
    .bind(name.as_str())
    .bind(track.id.as_str())
    .bind(name.as_str())
    .bind(json)
    .bind(now)
    .execute(pool)
    .await?;

    debug!("Stored {} in playlist {}", track.id, name);
    Ok(())
}

/// Remove a track from a playlist
pub async fn remove(pool: &SqlitePool, name: PlaylistName, id: &TrackId) -> Result<()> {
    sqlx::query("DELETE FROM playlist_members WHERE playlist = ? AND track_id = ?")
        .bind(name.as_str())
        .bind(id.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace all stored membership with `membership`
pub async fn save(pool: &SqlitePool, membership: &PlaylistMembership) -> Result<()> {
    let mut tx = pool.begin().await?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query("DELETE FROM playlist_members")
        .execute(&mut *tx)
        .await?;

    for (name, set) in membership.iter() {
        for (position, track) in set.iter().enumerate() {
            sqlx::query(
                "INSERT INTO playlist_members (playlist, track_id, position, track_json, added_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(name.as_str())
            .bind(track.id.as_str())
            .bind(position as i64)
            .bind(serde_json::to_string(track)?)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}
