use purestream_core::{Result, Stats};
use sqlx::{Row, SqlitePool};

/// Collection sizes across the whole catalogue
pub async fn counts(pool: &SqlitePool) -> Result<Stats> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS users,
            (SELECT COUNT(*) FROM songs) AS songs,
            (SELECT COUNT(*) FROM playlists) AS playlists
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(Stats {
        users: row.try_get("users")?,
        songs: row.try_get("songs")?,
        playlists: row.try_get("playlists")?,
    })
}
