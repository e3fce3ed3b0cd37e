//! User preferences
//!
//! String key-value pairs. The only preference the player uses today is the
//! app background color.

use crate::error::{Result, StorageError};
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

/// Background color preference key
pub const KEY_BACKGROUND_COLOR: &str = "appBackgroundColor";

/// Background color used until the user picks one
pub const DEFAULT_BACKGROUND_COLOR: &str = "#0A0E26";

/// Get a raw preference value
pub async fn get_preference(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| row.get::<String, _>("value")))
}

/// Set a raw preference value, replacing any previous one
pub async fn set_preference(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO preferences (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;

    debug!("Preference {} = {}", key, value);
    Ok(())
}

/// Remove a preference
pub async fn delete_preference(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM preferences WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}

/// Check for a `#RRGGBB` hex color
pub fn is_valid_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Current background color
///
/// Falls back to the default when nothing is stored or the stored value is
/// not a valid color.
pub async fn background_color(pool: &SqlitePool) -> Result<String> {
    match get_preference(pool, KEY_BACKGROUND_COLOR).await? {
        Some(color) if is_valid_hex_color(&color) => Ok(color),
        Some(color) => {
            warn!("Ignoring stored background color {:?}", color);
            Ok(DEFAULT_BACKGROUND_COLOR.to_string())
        }
        None => Ok(DEFAULT_BACKGROUND_COLOR.to_string()),
    }
}

/// Persist a new background color
pub async fn set_background_color(pool: &SqlitePool, color: &str) -> Result<()> {
    if !is_valid_hex_color(color) {
        return Err(StorageError::InvalidColor(color.to_string()));
    }
    set_preference(pool, KEY_BACKGROUND_COLOR, color).await
}
