/// Playlists API routes
use super::PageParams;
use crate::{
    error::{Result, ServerError},
    middleware::{AuthenticatedUser, MaybeUser},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use purestream_core::{
    parse_tags, NewPlaylist, Pagination, Playlist, PlaylistId, SongId, UpdatePlaylist, UserId,
    MAX_PLAYLIST_DESCRIPTION_LEN, MAX_PLAYLIST_NAME_LEN,
};
use purestream_storage::playlists;
use serde::{Deserialize, Serialize};

/// Tags arrive either as a comma separated string or as a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    Joined(String),
    List(Vec<String>),
}

impl TagInput {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagInput::Joined(raw) => parse_tags(&raw),
            TagInput::List(list) => parse_tags(&list.join(",")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub is_collaborative: Option<bool>,
    pub tags: Option<TagInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub is_collaborative: Option<bool>,
    pub tags: Option<TagInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSongRequest {
    pub song_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub song_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub playlist: Playlist,
}

#[derive(Debug, Serialize)]
pub struct PlaylistsResponse {
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistPageResponse {
    pub playlists: Vec<Playlist>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub message: String,
    pub is_following: bool,
    pub playlist: Playlist,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServerError::BadRequest("Playlist name is required".to_string()));
    }
    if name.chars().count() > MAX_PLAYLIST_NAME_LEN {
        return Err(ServerError::BadRequest(format!(
            "Playlist name cannot exceed {} characters",
            MAX_PLAYLIST_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_description(description: &str) -> Result<String> {
    let description = description.trim();
    if description.chars().count() > MAX_PLAYLIST_DESCRIPTION_LEN {
        return Err(ServerError::BadRequest(format!(
            "Description cannot exceed {} characters",
            MAX_PLAYLIST_DESCRIPTION_LEN
        )));
    }
    Ok(description.to_string())
}

async fn load(app_state: &AppState, id: &PlaylistId) -> Result<Playlist> {
    playlists::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))
}

/// Load a playlist the caller may edit (owner or collaborator)
async fn load_editable(app_state: &AppState, id: &PlaylistId, user_id: &UserId) -> Result<Playlist> {
    let playlist = load(app_state, id).await?;
    if !playlist.can_edit(user_id) {
        return Err(ServerError::Forbidden(
            "You are not allowed to modify this playlist".to_string(),
        ));
    }
    Ok(playlist)
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<PlaylistResponse>)> {
    let new_playlist = NewPlaylist {
        name: validate_name(&req.name)?,
        description: validate_description(req.description.as_deref().unwrap_or_default())?,
        owner_id: auth.user_id().clone(),
        is_public: req.is_public.unwrap_or(true),
        is_collaborative: req.is_collaborative.unwrap_or(false),
        tags: req.tags.map(TagInput::into_tags).unwrap_or_default(),
    };

    let playlist = playlists::create(&app_state.pool, new_playlist).await?;
    tracing::info!(playlist_id = %playlist.id, user_id = %auth.user_id(), "Playlist created");

    Ok((
        StatusCode::CREATED,
        Json(PlaylistResponse {
            message: Some("Playlist created successfully".to_string()),
            playlist,
        }),
    ))
}

/// GET /api/playlists/my
/// Playlists the caller owns or collaborates on
pub async fn my_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistsResponse>> {
    let playlists = playlists::for_member(&app_state.pool, auth.user_id()).await?;
    Ok(Json(PlaylistsResponse { playlists }))
}

/// GET /api/playlists/public
pub async fn public_playlists(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PlaylistPageResponse>> {
    let (page, limit) = params.resolve(20);
    let (playlists, total) = playlists::list_public(
        &app_state.pool,
        Pagination::offset(page, limit),
        i64::from(limit),
    )
    .await?;

    Ok(Json(PlaylistPageResponse {
        playlists,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// GET /api/playlists/:id
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    viewer: MaybeUser,
) -> Result<Json<PlaylistResponse>> {
    let playlist = load(&app_state, &PlaylistId::new(id)).await?;

    if !playlist.is_visible_to(viewer.user_id()) {
        return Err(ServerError::Forbidden("Access denied".to_string()));
    }

    Ok(Json(PlaylistResponse {
        message: None,
        playlist,
    }))
}

/// PUT /api/playlists/:id
/// Only the owner may change playlist metadata
pub async fn update_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Json<PlaylistResponse>> {
    let playlist_id = PlaylistId::new(id);
    let playlist = load(&app_state, &playlist_id).await?;

    if playlist.owner.id != *auth.user_id() {
        return Err(ServerError::Forbidden(
            "You are not allowed to modify this playlist".to_string(),
        ));
    }

    let update = UpdatePlaylist {
        name: req.name.as_deref().map(validate_name).transpose()?,
        description: req.description.as_deref().map(validate_description).transpose()?,
        is_public: req.is_public,
        is_collaborative: req.is_collaborative,
        tags: req.tags.map(TagInput::into_tags),
    };

    let playlist = playlists::update(&app_state.pool, &playlist_id, update).await?;

    Ok(Json(PlaylistResponse {
        message: Some("Playlist updated successfully".to_string()),
        playlist,
    }))
}

/// POST /api/playlists/:id/songs
pub async fn add_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AddSongRequest>,
) -> Result<Json<PlaylistResponse>> {
    let playlist_id = PlaylistId::new(id);
    load_editable(&app_state, &playlist_id, auth.user_id()).await?;

    let song_id = SongId::new(req.song_id);
    super::songs::ensure_song_exists(&app_state, &song_id).await?;

    let added = playlists::add_song(&app_state.pool, &playlist_id, &song_id, auth.user_id()).await?;
    if !added {
        return Err(ServerError::BadRequest(
            "Song is already in the playlist".to_string(),
        ));
    }

    Ok(Json(PlaylistResponse {
        message: Some("Song added to playlist".to_string()),
        playlist: load(&app_state, &playlist_id).await?,
    }))
}

/// DELETE /api/playlists/:id/songs/:song_id
pub async fn remove_song(
    Path((id, song_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistResponse>> {
    let playlist_id = PlaylistId::new(id);
    load_editable(&app_state, &playlist_id, auth.user_id()).await?;

    playlists::remove_song(&app_state.pool, &playlist_id, &SongId::new(song_id)).await?;

    Ok(Json(PlaylistResponse {
        message: Some("Song removed from playlist".to_string()),
        playlist: load(&app_state, &playlist_id).await?,
    }))
}

/// PUT /api/playlists/:id/reorder
pub async fn reorder(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<PlaylistResponse>> {
    let playlist_id = PlaylistId::new(id);
    load_editable(&app_state, &playlist_id, auth.user_id()).await?;

    let song_ids: Vec<SongId> = req.song_ids.into_iter().map(SongId::new).collect();
    playlists::reorder(&app_state.pool, &playlist_id, &song_ids).await?;

    Ok(Json(PlaylistResponse {
        message: Some("Playlist reordered successfully".to_string()),
        playlist: load(&app_state, &playlist_id).await?,
    }))
}

/// POST /api/playlists/:id/follow
pub async fn toggle_follow(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<FollowResponse>> {
    let playlist_id = PlaylistId::new(id);
    let playlist = load(&app_state, &playlist_id).await?;

    if !playlist.is_public {
        return Err(ServerError::Forbidden("This playlist is private".to_string()));
    }

    let is_following =
        playlists::toggle_follow(&app_state.pool, &playlist_id, auth.user_id()).await?;

    Ok(Json(FollowResponse {
        message: if is_following {
            "Playlist followed".to_string()
        } else {
            "Playlist unfollowed".to_string()
        },
        is_following,
        playlist: load(&app_state, &playlist_id).await?,
    }))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MessageResponse>> {
    let playlist_id = PlaylistId::new(id);
    load_editable(&app_state, &playlist_id, auth.user_id()).await?;

    playlists::delete(&app_state.pool, &playlist_id).await?;
    tracing::info!(playlist_id = %playlist_id, "Playlist deleted");

    Ok(Json(MessageResponse {
        message: "Playlist deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validation() {
        assert_eq!(validate_name("  Mix  ").unwrap(), "Mix");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(MAX_PLAYLIST_NAME_LEN)).is_ok());
        assert!(validate_name(&"a".repeat(MAX_PLAYLIST_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_description_validation() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"d".repeat(MAX_PLAYLIST_DESCRIPTION_LEN + 1)).is_err());
    }

    #[test]
    fn test_tags_accept_string_or_list() {
        let joined: TagInput = serde_json::from_str(r#""chill, focus""#).unwrap();
        assert_eq!(joined.into_tags(), vec!["chill", "focus"]);

        let list: TagInput = serde_json::from_str(r#"["chill", " focus "]"#).unwrap();
        assert_eq!(list.into_tags(), vec!["chill", "focus"]);
    }
}
