/// Playlist domain types
use super::ids::{PlaylistId, UserId};
use super::song::Song;
use super::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted playlist name
pub const MAX_PLAYLIST_NAME_LEN: usize = 100;

/// Longest accepted playlist description
pub const MAX_PLAYLIST_DESCRIPTION_LEN: usize = 500;

/// Playlist with its ordered songs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    pub owner: UserSummary,

    /// Songs in playback order
    #[serde(default)]
    pub songs: Vec<PlaylistSong>,

    pub is_public: bool,
    pub is_collaborative: bool,

    /// Users allowed to edit the playlist besides the owner
    #[serde(default)]
    pub collaborators: Vec<UserId>,

    /// Number of followers
    #[serde(default)]
    pub followers: i64,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Sum of song durations in seconds
    #[serde(default)]
    pub total_duration: f64,

    #[serde(default)]
    pub play_count: i64,

    #[serde(default)]
    pub song_count: usize,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Owner or collaborator
    pub fn can_edit(&self, user_id: &UserId) -> bool {
        self.owner.id == *user_id || self.collaborators.contains(user_id)
    }

    /// Public playlists are visible to everyone, private ones only to editors
    pub fn is_visible_to(&self, user_id: Option<&UserId>) -> bool {
        self.is_public || user_id.is_some_and(|id| self.can_edit(id))
    }

    pub fn contains_song(&self, song_id: &super::ids::SongId) -> bool {
        self.songs.iter().any(|entry| entry.song.id == *song_id)
    }
}

/// A song inside a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSong {
    pub song: Song,
    pub added_at: DateTime<Utc>,
    pub added_by: UserSummary,
}

/// Data needed to create a playlist
#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub name: String,
    pub description: String,
    pub owner_id: UserId,
    pub is_public: bool,
    pub is_collaborative: bool,
    pub tags: Vec<String>,
}

/// Partial playlist update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub is_collaborative: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Split a comma separated tag list, trimming whitespace and dropping blanks
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SongId;

    fn playlist(is_public: bool) -> Playlist {
        let now = Utc::now();
        Playlist {
            id: PlaylistId::new("p1"),
            name: "Road trip".to_string(),
            description: String::new(),
            cover_image: None,
            owner: UserSummary {
                id: UserId::new("owner"),
                username: "owner".to_string(),
                profile_picture: None,
            },
            songs: vec![PlaylistSong {
                song: Song::new(SongId::new("s1"), "One", "A"),
                added_at: now,
                added_by: UserSummary {
                    id: UserId::new("owner"),
                    username: "owner".to_string(),
                    profile_picture: None,
                },
            }],
            is_public,
            is_collaborative: true,
            collaborators: vec![UserId::new("friend")],
            followers: 0,
            tags: vec![],
            total_duration: 0.0,
            play_count: 0,
            song_count: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_private_playlist_visibility() {
        let p = playlist(false);
        assert!(p.is_visible_to(Some(&UserId::new("owner"))));
        assert!(p.is_visible_to(Some(&UserId::new("friend"))));
        assert!(!p.is_visible_to(Some(&UserId::new("stranger"))));
        assert!(!p.is_visible_to(None));
        assert!(playlist(true).is_visible_to(None));
    }

    #[test]
    fn test_contains_song() {
        let p = playlist(true);
        assert!(p.contains_song(&SongId::new("s1")));
        assert!(!p.contains_song(&SongId::new("s2")));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" rock, indie ,,live "), vec!["rock", "indie", "live"]);
        assert!(parse_tags("").is_empty());
    }
}
