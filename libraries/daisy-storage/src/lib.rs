//! Daisy Player Storage
//!
//! `SQLite` persistence for the few things that survive a restart:
//!
//! - **Preferences**: key-value strings (the app background color)
//! - **Favorites**: the favorites set, in insertion order
//! - **Playlists**: membership of the built-in named playlists
//!
//! Each feature owns its own queries as a vertical slice taking a
//! `&SqlitePool`. Tracks are stored as JSON descriptors so a favorite can be
//! listed without the catalog that produced it.
//!
//! # Example
//!
//! ```rust,no_run
//! use daisy_storage::{create_pool, preferences, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://daisy.db").await?;
//! run_migrations(&pool).await?;
//!
//! preferences::set_background_color(&pool, "#1DB954").await?;
//! assert_eq!(preferences::background_color(&pool).await?, "#1DB954");
//! # Ok(())
//! # }
//! ```

mod error;

pub mod favorites;
pub mod playlists;
pub mod preferences;

pub use error::{Result, StorageError};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Embedded migrations, applied in order
const MIGRATIONS: &[&str] = &[
    include_str!("../migrations/20250601000001_create_preferences.sql"),
    include_str!("../migrations/20250601000002_create_favorites.sql"),
    include_str!("../migrations/20250601000003_create_playlist_members.sql"),
];

/// Run database migrations
///
/// Every migration is idempotent, so this is safe to call on each start.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    for migration in MIGRATIONS {
        sqlx::query(migration)
            .execute(pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
    }
    debug!("Applied {} migrations", MIGRATIONS.len());
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://daisy.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create a migrated in-memory pool
///
/// Limited to a single connection that is never recycled: each in-memory
/// connection is its own database.
pub async fn in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
