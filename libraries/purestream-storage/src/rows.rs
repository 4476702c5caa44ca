//! Row mapping shared by the vertical slices

use chrono::{DateTime, Utc};
use purestream_core::{Playlist, Result, Song, User, UserSummary};
use sqlx::{sqlite::SqliteRow, Row};

/// Song columns; pair with [`SONG_FROM`]
pub(crate) const SONG_FIELDS: &str = r#"
    s.id, s.title, s.artist, s.album, s.genre, s.duration, s.file_path, s.cover_image,
    s.lyrics, s.release_year, s.play_count, s.is_public, s.tags, s.created_at, s.updated_at,
    s.uploaded_by, u.username AS uploader_username, u.profile_picture AS uploader_picture,
    (SELECT COUNT(*) FROM song_likes l WHERE l.song_id = s.id) AS like_count
"#;

pub(crate) const SONG_FROM: &str = "FROM songs s INNER JOIN users u ON u.id = s.uploaded_by";

pub(crate) const USER_SELECT: &str = r#"
    SELECT u.id, u.username, u.email, u.profile_picture, u.bio, u.favorite_genres,
           u.is_online, u.last_seen, u.created_at, u.updated_at,
           (SELECT COUNT(*) FROM user_follows f WHERE f.followee_id = u.id) AS follower_count,
           (SELECT COUNT(*) FROM user_follows f WHERE f.follower_id = u.id) AS following_count
    FROM users u
"#;

pub(crate) const PLAYLIST_SELECT: &str = r#"
    SELECT p.id, p.name, p.description, p.cover_image, p.owner_id,
           o.username AS owner_username, o.profile_picture AS owner_picture,
           p.is_public, p.is_collaborative, p.tags, p.total_duration, p.play_count,
           p.created_at, p.updated_at,
           (SELECT COUNT(*) FROM playlist_followers f WHERE f.playlist_id = p.id) AS follower_count,
           (SELECT COUNT(*) FROM playlist_songs ps WHERE ps.playlist_id = p.id) AS song_count
    FROM playlists p
    INNER JOIN users o ON o.id = p.owner_id
"#;

pub(crate) fn song_from_row(row: &SqliteRow) -> Result<Song> {
    Ok(Song {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        album: row.try_get("album")?,
        genre: row.try_get("genre")?,
        duration: Some(row.try_get("duration")?),
        file_path: Some(row.try_get("file_path")?),
        audio_url: None,
        url: None,
        cover_image: row.try_get("cover_image")?,
        lyrics: row.try_get("lyrics")?,
        release_year: row.try_get("release_year")?,
        play_count: row.try_get("play_count")?,
        likes: row.try_get("like_count")?,
        uploaded_by: Some(UserSummary {
            id: row.try_get("uploaded_by")?,
            username: row.try_get("uploader_username")?,
            profile_picture: row.try_get("uploader_picture")?,
        }),
        is_public: row.try_get::<i64, _>("is_public")? != 0,
        tags: decode_list(row.try_get("tags")?),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

pub(crate) fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        profile_picture: row.try_get("profile_picture")?,
        bio: row.try_get("bio")?,
        followers: row.try_get("follower_count")?,
        following: row.try_get("following_count")?,
        favorite_genres: decode_list(row.try_get("favorite_genres")?),
        is_online: row.try_get::<i64, _>("is_online")? != 0,
        last_seen: row.try_get("last_seen")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Playlist header without songs or collaborators
pub(crate) fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        cover_image: row.try_get("cover_image")?,
        owner: UserSummary {
            id: row.try_get("owner_id")?,
            username: row.try_get("owner_username")?,
            profile_picture: row.try_get("owner_picture")?,
        },
        songs: Vec::new(),
        is_public: row.try_get::<i64, _>("is_public")? != 0,
        is_collaborative: row.try_get::<i64, _>("is_collaborative")? != 0,
        collaborators: Vec::new(),
        followers: row.try_get("follower_count")?,
        tags: decode_list(row.try_get("tags")?),
        total_duration: row.try_get("total_duration")?,
        play_count: row.try_get("play_count")?,
        song_count: row.try_get::<i64, _>("song_count")? as usize,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// JSON array column to `Vec<String>`; malformed data reads as empty
pub(crate) fn decode_list(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring malformed list column");
        Vec::new()
    })
}

pub(crate) fn encode_list(items: &[String]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Escape `%`, `_` and `\` so user input matches literally inside `LIKE ... ESCAPE '\'`
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("AC/DC"), "%ac/dc%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_list_round_trip() {
        let encoded = encode_list(&["rock".to_string(), "jazz".to_string()]).unwrap();
        assert_eq!(decode_list(encoded), vec!["rock", "jazz"]);
        assert!(decode_list("not json".to_string()).is_empty());
    }
}
