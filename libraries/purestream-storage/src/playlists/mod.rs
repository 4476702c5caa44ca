use crate::rows::{encode_list, playlist_from_row, song_from_row, PLAYLIST_SELECT, SONG_FIELDS, SONG_FROM};
use chrono::{DateTime, Utc};
use purestream_core::{
    CoreError, NewPlaylist, Playlist, PlaylistId, PlaylistSong, Result, SongId, UpdatePlaylist,
    UserId, UserSummary,
};
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Create a playlist owned by `playlist.owner_id`
pub async fn create(pool: &SqlitePool, playlist: NewPlaylist) -> Result<Playlist> {
    let id = PlaylistId::generate();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO playlists (
            id, name, description, owner_id, is_public, is_collaborative, tags,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(&playlist.owner_id)
    .bind(i64::from(playlist.is_public))
    .bind(i64::from(playlist.is_collaborative))
    .bind(encode_list(&playlist.tags)?)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| CoreError::storage("Failed to retrieve created playlist"))
}

/// Get playlist by ID with songs (in position order) and collaborators
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let sql = format!("{PLAYLIST_SELECT} WHERE p.id = ?");
    let Some(row) = sqlx::query(&sql).bind(id).fetch_optional(pool).await? else {
        return Ok(None);
    };

    let mut playlist = playlist_from_row(&row)?;
    playlist.songs = load_songs(pool, id).await?;
    playlist.collaborators = load_collaborators(pool, id).await?;

    Ok(Some(playlist))
}

async fn load_songs(pool: &SqlitePool, id: &PlaylistId) -> Result<Vec<PlaylistSong>> {
    let sql = format!(
        "SELECT {SONG_FIELDS}, ps.added_at, ps.added_by, \
                a.username AS added_by_username, a.profile_picture AS added_by_picture \
         {SONG_FROM} \
         INNER JOIN playlist_songs ps ON ps.song_id = s.id \
         INNER JOIN users a ON a.id = ps.added_by \
         WHERE ps.playlist_id = ? ORDER BY ps.position"
    );

    let rows = sqlx::query(&sql).bind(id).fetch_all(pool).await?;

    rows.iter()
        .map(|row| {
            Ok(PlaylistSong {
                song: song_from_row(row)?,
                added_at: row.try_get::<DateTime<Utc>, _>("added_at")?,
                added_by: UserSummary {
                    id: row.try_get("added_by")?,
                    username: row.try_get("added_by_username")?,
                    profile_picture: row.try_get("added_by_picture")?,
                },
            })
        })
        .collect()
}

async fn load_collaborators(pool: &SqlitePool, id: &PlaylistId) -> Result<Vec<UserId>> {
    let rows = sqlx::query("SELECT user_id FROM playlist_collaborators WHERE playlist_id = ?")
        .bind(id)
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| row.try_get("user_id").map_err(CoreError::from))
        .collect()
}

/// Fetch several playlists fully hydrated, keeping the given order
async fn hydrate(pool: &SqlitePool, ids: Vec<PlaylistId>) -> Result<Vec<Playlist>> {
    let mut playlists = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(playlist) = get_by_id(pool, &id).await? {
            playlists.push(playlist);
        }
    }
    Ok(playlists)
}

fn ids_from_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<PlaylistId>> {
    rows.iter()
        .map(|row| row.try_get("id").map_err(CoreError::from))
        .collect()
}

/// Playlists the user owns or collaborates on, most recently updated first
pub async fn for_member(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT p.id, p.updated_at
        FROM playlists p
        LEFT JOIN playlist_collaborators c ON c.playlist_id = p.id
        WHERE p.owner_id = ?1 OR c.user_id = ?1
        ORDER BY p.updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    hydrate(pool, ids_from_rows(&rows)?).await
}

/// Public playlists, most followed first, with the total count
pub async fn list_public(
    pool: &SqlitePool,
    offset: i64,
    limit: i64,
) -> Result<(Vec<Playlist>, i64)> {
    let rows = sqlx::query(
        r#"
        SELECT p.id,
               (SELECT COUNT(*) FROM playlist_followers f WHERE f.playlist_id = p.id) AS follower_count
        FROM playlists p
        WHERE p.is_public = 1
        ORDER BY follower_count DESC, p.created_at DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM playlists WHERE is_public = 1")
        .fetch_one(pool)
        .await?
        .try_get("n")?;

    Ok((hydrate(pool, ids_from_rows(&rows)?).await?, total))
}

/// Apply a partial update to the playlist header
pub async fn update(pool: &SqlitePool, id: &PlaylistId, update: UpdatePlaylist) -> Result<Playlist> {
    let current = get_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Playlist", id.as_str()))?;

    let name = update.name.unwrap_or(current.name);
    let description = update.description.unwrap_or(current.description);
    let is_public = update.is_public.unwrap_or(current.is_public);
    let is_collaborative = update.is_collaborative.unwrap_or(current.is_collaborative);
    let tags = update.tags.unwrap_or(current.tags);

    sqlx::query(
        r#"
        UPDATE playlists
        SET name = ?, description = ?, is_public = ?, is_collaborative = ?, tags = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(&description)
    .bind(i64::from(is_public))
    .bind(i64::from(is_collaborative))
    .bind(encode_list(&tags)?)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Playlist", id.as_str()))
}

/// Append a song; returns `false` when it is already in the playlist
pub async fn add_song(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    song_id: &SongId,
    added_by: &UserId,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query(
        "SELECT COUNT(*) AS n FROM playlist_songs WHERE playlist_id = ? AND song_id = ?",
    )
    .bind(playlist_id)
    .bind(song_id)
    .fetch_one(&mut *tx)
    .await?
    .try_get::<i64, _>("n")?
        > 0;

    if exists {
        return Ok(false);
    }

    let next_position: i64 = sqlx::query(
        "SELECT COALESCE(MAX(position), -1) + 1 AS pos FROM playlist_songs WHERE playlist_id = ?",
    )
    .bind(playlist_id)
    .fetch_one(&mut *tx)
    .await?
    .try_get("pos")?;

    sqlx::query(
        r#"
        INSERT INTO playlist_songs (playlist_id, song_id, position, added_by, added_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(playlist_id)
    .bind(song_id)
    .bind(next_position)
    .bind(added_by)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    recalculate_duration(&mut tx, playlist_id).await?;
    tx.commit().await?;

    Ok(true)
}

/// Remove a song; returns whether it was present
pub async fn remove_song(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    song_id: &SongId,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
        .bind(playlist_id)
        .bind(song_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    recalculate_duration(&mut tx, playlist_id).await?;
    tx.commit().await?;

    Ok(removed > 0)
}

/// Rewrite the song order
///
/// Ids not already in the playlist are ignored, and songs missing from
/// `song_ids` are dropped.
pub async fn reorder(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    song_ids: &[SongId],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "SELECT song_id, added_by, added_at FROM playlist_songs WHERE playlist_id = ?",
    )
    .bind(playlist_id)
    .fetch_all(&mut *tx)
    .await?;

    let mut existing = Vec::with_capacity(rows.len());
    for row in &rows {
        existing.push((
            row.try_get::<SongId, _>("song_id")?,
            row.try_get::<UserId, _>("added_by")?,
            row.try_get::<DateTime<Utc>, _>("added_at")?,
        ));
    }

    sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ?")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    let mut position: i64 = 0;
    for song_id in song_ids {
        let Some(index) = existing.iter().position(|(id, _, _)| id == song_id) else {
            continue;
        };
        let (id, added_by, added_at) = existing.swap_remove(index);

        sqlx::query(
            r#"
            INSERT INTO playlist_songs (playlist_id, song_id, position, added_by, added_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(playlist_id)
        .bind(&id)
        .bind(position)
        .bind(&added_by)
        .bind(added_at)
        .execute(&mut *tx)
        .await?;

        position += 1;
    }

    recalculate_duration(&mut tx, playlist_id).await?;
    tx.commit().await?;

    Ok(())
}

/// Grant a user edit rights on a collaborative playlist
pub async fn add_collaborator(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO playlist_collaborators (playlist_id, user_id)
        VALUES (?, ?)
        ON CONFLICT(playlist_id, user_id) DO NOTHING
        "#,
    )
    .bind(playlist_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Recompute `total_duration` and touch `updated_at`
async fn recalculate_duration(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE playlists
        SET total_duration = (
                SELECT COALESCE(SUM(s.duration), 0)
                FROM playlist_songs ps
                INNER JOIN songs s ON s.id = ps.song_id
                WHERE ps.playlist_id = playlists.id
            ),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(Utc::now())
    .bind(playlist_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Delete a playlist and its memberships
pub async fn delete(pool: &SqlitePool, id: &PlaylistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CoreError::not_found("Playlist", id.as_str()));
    }
    Ok(())
}

/// Follow or unfollow; returns whether the user now follows the playlist
pub async fn toggle_follow(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> Result<bool> {
    let followed = is_followed(pool, playlist_id, user_id).await?;
    set_followed(pool, playlist_id, user_id, !followed).await?;
    Ok(!followed)
}

/// Idempotently set the follow flag
pub async fn set_followed(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    user_id: &UserId,
    followed: bool,
) -> Result<()> {
    if followed {
        sqlx::query(
            r#"
            INSERT INTO playlist_followers (playlist_id, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(playlist_id, user_id) DO NOTHING
            "#,
        )
        .bind(playlist_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    } else {
        sqlx::query("DELETE FROM playlist_followers WHERE playlist_id = ? AND user_id = ?")
            .bind(playlist_id)
            .bind(user_id)
            .execute(pool)
            .await?;
    }
    Ok(())
}

pub async fn is_followed(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> Result<bool> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS n FROM playlist_followers WHERE playlist_id = ? AND user_id = ?",
    )
    .bind(playlist_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(row.try_get::<i64, _>("n")? > 0)
}

/// Playlists a user follows, most recently followed first
pub async fn followed_by(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id FROM playlists p
        INNER JOIN playlist_followers f ON f.playlist_id = p.id
        WHERE f.user_id = ?
        ORDER BY f.created_at DESC, f.rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    hydrate(pool, ids_from_rows(&rows)?).await
}

/// Public playlists owned by a user
pub async fn public_by_owner(pool: &SqlitePool, owner_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        "SELECT id FROM playlists WHERE owner_id = ? AND is_public = 1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    hydrate(pool, ids_from_rows(&rows)?).await
}

/// Most played public playlists
pub async fn popular(pool: &SqlitePool, limit: i64) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        "SELECT id FROM playlists WHERE is_public = 1 ORDER BY play_count DESC, created_at DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    hydrate(pool, ids_from_rows(&rows)?).await
}
