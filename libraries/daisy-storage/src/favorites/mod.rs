//! Favorites persistence
//!
//! Rows keep an explicit position so insertion order survives a restart.

use crate::error::Result;
use daisy_core::{Track, TrackId};
use daisy_library::Favorites;
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// Load the favorites set in insertion order
pub async fn load(pool: &SqlitePool) -> Result<Favorites> {
    let rows = sqlx::query("SELECT track_json FROM favorites ORDER BY position")
        .fetch_all(pool)
        .await?;

    let tracks = rows
        .iter()
        .map(|row| serde_json::from_str::<Track>(&row.get::<String, _>("track_json")))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Favorites::from_tracks(tracks))
}

/// Append a favorite; a track that is already a favorite keeps its place
pub async fn add(pool: &SqlitePool, track: &Track) -> Result<()> {
    let json = serde_json::to_string(track)?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT OR IGNORE INTO favorites (track_id, position, track_json, added_at)
         VALUES (?, (SELECT COALESCE(MAX(position), -1) + 1 FROM favorites), ?, ?)",
    )
    .bind(track.id.as_str())
    .bind(json)
    .bind(now)
    .execute(pool)
    .await?;

    debug!("Stored favorite {}", track.id);
    Ok(())
}

/// Remove a favorite; removing an absent track is a no-op
pub async fn remove(pool: &SqlitePool, id: &TrackId) -> Result<()> {
    sqlx::query("DELETE FROM favorites WHERE track_id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace the stored favorites with `favorites`
pub async fn save(pool: &SqlitePool, favorites: &Favorites) -> Result<()> {
    let mut tx = pool.begin().await?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query("DELETE FROM favorites").execute(&mut *tx).await?;

    for (position, track) in favorites.iter().enumerate() {
        sqlx::query(
            "INSERT INTO favorites (track_id, position, track_json, added_at) VALUES (?, ?, ?, ?)",
        )
        .bind(track.id.as_str())
        .bind(position as i64)
        .bind(serde_json::to_string(track)?)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    debug!("Saved {} favorites", favorites.len());
    Ok(())
}
