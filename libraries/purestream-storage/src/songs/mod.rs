use crate::rows::{encode_list, like_pattern, song_from_row, SONG_FIELDS, SONG_FROM};
use chrono::Utc;
use purestream_core::{CoreError, NewSong, Result, Song, SongId, UserId, UNKNOWN_ALBUM};
use sqlx::{Row, SqlitePool};

/// Filters for the public song listing
#[derive(Debug, Clone, Default)]
pub struct SongFilter {
    /// Exact genre match
    pub genre: Option<String>,
    /// Case-insensitive substring of the artist
    pub artist: Option<String>,
}

/// Free-text search plus field filters
#[derive(Debug, Clone, Default)]
pub struct SongSearch {
    /// Matches title, artist, album, genre and tags
    pub q: Option<String>,
    pub genre: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

/// Insert a song record for an uploaded file
pub async fn create(pool: &SqlitePool, song: NewSong) -> Result<Song> {
    let id = SongId::generate();
    let now = Utc::now();
    let album = song
        .album
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());

    sqlx::query(
        r#"
        INSERT INTO songs (
            id, title, artist, album, genre, duration, file_path, cover_image, lyrics,
            release_year, uploaded_by, is_public, tags, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&album)
    .bind(&song.genre)
    .bind(song.duration)
    .bind(&song.file_path)
    .bind(&song.cover_image)
    .bind(&song.lyrics)
    .bind(song.release_year)
    .bind(&song.uploaded_by)
    .bind(i64::from(song.is_public))
    .bind(encode_list(&song.tags)?)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| CoreError::storage("Failed to retrieve created song"))
}

/// Get song by ID
pub async fn get_by_id(pool: &SqlitePool, id: &SongId) -> Result<Option<Song>> {
    let sql = format!("SELECT {SONG_FIELDS} {SONG_FROM} WHERE s.id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(song_from_row).transpose()
}

/// Public songs, newest first, with the total matching count
pub async fn list_public(
    pool: &SqlitePool,
    filter: &SongFilter,
    offset: i64,
    limit: i64,
) -> Result<(Vec<Song>, i64)> {
    let search = SongSearch {
        genre: filter.genre.clone(),
        artist: filter.artist.clone(),
        ..SongSearch::default()
    };
    search_public(pool, &search, offset, limit).await
}

/// Search public songs, newest first, with the total matching count
pub async fn search(
    pool: &SqlitePool,
    query: &SongSearch,
    offset: i64,
    limit: i64,
) -> Result<(Vec<Song>, i64)> {
    search_public(pool, query, offset, limit).await
}

async fn search_public(
    pool: &SqlitePool,
    query: &SongSearch,
    offset: i64,
    limit: i64,
) -> Result<(Vec<Song>, i64)> {
    let mut clauses = vec!["s.is_public = 1".to_string()];
    let mut params: Vec<String> = Vec::new();

    if let Some(q) = non_empty(&query.q) {
        clauses.push(
            r#"(LOWER(s.title) LIKE ? ESCAPE '\' OR LOWER(s.artist) LIKE ? ESCAPE '\'
                OR LOWER(s.album) LIKE ? ESCAPE '\' OR LOWER(COALESCE(s.genre, '')) LIKE ? ESCAPE '\'
                OR LOWER(s.tags) LIKE ? ESCAPE '\')"#
                .to_string(),
        );
        let pattern = like_pattern(q);
        params.extend(std::iter::repeat(pattern).take(5));
    }
    if let Some(genre) = non_empty(&query.genre) {
        clauses.push("s.genre = ?".to_string());
        params.push(genre.to_string());
    }
    if let Some(artist) = non_empty(&query.artist) {
        clauses.push(r"LOWER(s.artist) LIKE ? ESCAPE '\'".to_string());
        params.push(like_pattern(artist));
    }
    if let Some(album) = non_empty(&query.album) {
        clauses.push(r"LOWER(s.album) LIKE ? ESCAPE '\'".to_string());
        params.push(like_pattern(album));
    }

    let where_clause = clauses.join(" AND ");

    let count_sql = format!("SELECT COUNT(*) AS n FROM songs s WHERE {where_clause}");
    let mut count_query = sqlx::query(&count_sql);
    for param in &params {
        count_query = count_query.bind(param);
    }
    let total: i64 = count_query.fetch_one(pool).await?.try_get("n")?;

    let sql = format!(
        "SELECT {SONG_FIELDS} {SONG_FROM} WHERE {where_clause} \
         ORDER BY s.created_at DESC, s.rowid DESC LIMIT ? OFFSET ?"
    );
    let mut page_query = sqlx::query(&sql);
    for param in &params {
        page_query = page_query.bind(param);
    }
    let rows = page_query.bind(limit).bind(offset).fetch_all(pool).await?;
    let songs = rows.iter().map(song_from_row).collect::<Result<Vec<_>>>()?;

    Ok((songs, total))
}

/// Most played public songs
pub async fn popular(pool: &SqlitePool, limit: i64) -> Result<Vec<Song>> {
    let sql = format!(
        "SELECT {SONG_FIELDS} {SONG_FROM} WHERE s.is_public = 1 \
         ORDER BY s.play_count DESC, s.created_at DESC LIMIT ?"
    );
    let rows = sqlx::query(&sql).bind(limit).fetch_all(pool).await?;
    rows.iter().map(song_from_row).collect()
}

/// Distinct genres of public songs, alphabetical
pub async fn genres(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT genre FROM songs
        WHERE is_public = 1 AND genre IS NOT NULL AND genre != ''
        ORDER BY genre
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| row.try_get("genre").map_err(CoreError::from))
        .collect()
}

/// Add one play; fails with `NotFound` for unknown songs
pub async fn increment_play_count(pool: &SqlitePool, id: &SongId) -> Result<()> {
    let result = sqlx::query("UPDATE songs SET play_count = play_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CoreError::not_found("Song", id.as_str()));
    }
    Ok(())
}

/// Like or unlike; returns whether the user now likes the song
pub async fn toggle_like(pool: &SqlitePool, song_id: &SongId, user_id: &UserId) -> Result<bool> {
    let liked = is_liked(pool, song_id, user_id).await?;
    set_liked(pool, song_id, user_id, !liked).await?;
    Ok(!liked)
}

/// Idempotently set the like flag
pub async fn set_liked(
    pool: &SqlitePool,
    song_id: &SongId,
    user_id: &UserId,
    liked: bool,
) -> Result<()> {
    if liked {
        sqlx::query(
            r#"
            INSERT INTO song_likes (song_id, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(song_id, user_id) DO NOTHING
            "#,
        )
        .bind(song_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    } else {
        sqlx::query("DELETE FROM song_likes WHERE song_id = ? AND user_id = ?")
            .bind(song_id)
            .bind(user_id)
            .execute(pool)
            .await?;
    }
    Ok(())
}

pub async fn is_liked(pool: &SqlitePool, song_id: &SongId, user_id: &UserId) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM song_likes WHERE song_id = ? AND user_id = ?")
        .bind(song_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(row.try_get::<i64, _>("n")? > 0)
}

/// Songs liked by a user, most recently liked first
pub async fn liked_by(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Song>> {
    let sql = format!(
        "SELECT {SONG_FIELDS} {SONG_FROM} \
         INNER JOIN song_likes sl ON sl.song_id = s.id \
         WHERE sl.user_id = ? ORDER BY sl.created_at DESC, sl.rowid DESC"
    );
    let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;
    rows.iter().map(song_from_row).collect()
}

/// Public songs uploaded by a user
pub async fn by_uploader(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Song>> {
    let sql = format!(
        "SELECT {SONG_FIELDS} {SONG_FROM} \
         WHERE s.uploaded_by = ? AND s.is_public = 1 ORDER BY s.created_at DESC"
    );
    let rows = sqlx::query(&sql).bind(user_id).fetch_all(pool).await?;
    rows.iter().map(song_from_row).collect()
}

/// Most played public songs within any of `genres`
pub async fn popular_in_genres(
    pool: &SqlitePool,
    genres: &[String],
    limit: i64,
) -> Result<Vec<Song>> {
    if genres.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; genres.len()].join(", ");
    let sql = format!(
        "SELECT {SONG_FIELDS} {SONG_FROM} \
         WHERE s.is_public = 1 AND s.genre IN ({placeholders}) \
         ORDER BY s.play_count DESC, s.created_at DESC LIMIT ?"
    );

    let mut query = sqlx::query(&sql);
    for genre in genres {
        query = query.bind(genre);
    }
    let rows = query.bind(limit).fetch_all(pool).await?;
    rows.iter().map(song_from_row).collect()
}

/// Most played public songs not in `exclude`
pub async fn popular_excluding(
    pool: &SqlitePool,
    exclude: &[SongId],
    limit: i64,
) -> Result<Vec<Song>> {
    let exclusion = if exclude.is_empty() {
        String::new()
    } else {
        format!("AND s.id NOT IN ({})", vec!["?"; exclude.len()].join(", "))
    };
    let sql = format!(
        "SELECT {SONG_FIELDS} {SONG_FROM} WHERE s.is_public = 1 {exclusion} \
         ORDER BY s.play_count DESC, s.created_at DESC LIMIT ?"
    );

    let mut query = sqlx::query(&sql);
    for id in exclude {
        query = query.bind(id);
    }
    let rows = query.bind(limit).fetch_all(pool).await?;
    rows.iter().map(song_from_row).collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
