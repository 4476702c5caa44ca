//! PureStream Storage
//!
//! `SQLite` persistence layer for the PureStream backend.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries (`users`, `songs`,
//!   `playlists`, `stats`)
//! - **Plain functions**: every operation takes a `&SqlitePool` and returns
//!   `purestream_core::Result`
//! - **Counters in SQL**: play counts, likes and followers are updated with
//!   single statements so concurrent requests never lose increments
//!
//! # Example
//!
//! ```rust,no_run
//! use purestream_storage::{create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://purestream.db").await?;
//! run_migrations(&pool).await?;
//!
//! let stats = purestream_storage::stats::counts(&pool).await?;
//! println!("{} songs", stats.songs);
//! # Ok(())
//! # }
//! ```

mod rows;

// Vertical slices
pub mod playlists;
pub mod songs;
pub mod stats;
pub mod users;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://purestream.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool ready");

    Ok(pool)
}
