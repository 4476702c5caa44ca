/// Favorites API routes
///
/// Liked songs and followed playlists of the caller. Every route here sits
/// behind the auth middleware.
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use purestream_core::{Playlist, PlaylistId, Song, SongId};
use purestream_storage::{playlists, songs};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SongsResponse {
    pub songs: Vec<Song>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistsResponse {
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub is_liked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowedStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub is_followed: bool,
}

fn updated(is_liked: bool) -> Json<LikeStatus> {
    Json(LikeStatus {
        message: Some("Favorites updated".to_string()),
        is_liked,
    })
}

/// GET /api/favorites/songs
pub async fn list_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<SongsResponse>> {
    let songs = songs::liked_by(&app_state.pool, auth.user_id()).await?;
    Ok(Json(SongsResponse { songs }))
}

/// GET /api/favorites/playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistsResponse>> {
    let playlists = playlists::followed_by(&app_state.pool, auth.user_id()).await?;
    Ok(Json(PlaylistsResponse { playlists }))
}

/// POST /api/favorites/songs/:id
pub async fn toggle_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<LikeStatus>> {
    let song_id = SongId::new(id);
    super::songs::ensure_song_exists(&app_state, &song_id).await?;

    let is_liked = songs::toggle_like(&app_state.pool, &song_id, auth.user_id()).await?;
    Ok(updated(is_liked))
}

/// PUT /api/favorites/songs/:id
pub async fn add_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<LikeStatus>> {
    let song_id = SongId::new(id);
    super::songs::ensure_song_exists(&app_state, &song_id).await?;

    songs::set_liked(&app_state.pool, &song_id, auth.user_id(), true).await?;
    Ok(updated(true))
}

/// DELETE /api/favorites/songs/:id
pub async fn remove_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<LikeStatus>> {
    let song_id = SongId::new(id);
    super::songs::ensure_song_exists(&app_state, &song_id).await?;

    songs::set_liked(&app_state.pool, &song_id, auth.user_id(), false).await?;
    Ok(updated(false))
}

/// GET /api/favorites/songs/:id/check
pub async fn check_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<LikeStatus>> {
    let song_id = SongId::new(id);
    super::songs::ensure_song_exists(&app_state, &song_id).await?;

    let is_liked = songs::is_liked(&app_state.pool, &song_id, auth.user_id()).await?;
    Ok(Json(LikeStatus {
        message: None,
        is_liked,
    }))
}

/// POST /api/favorites/playlists/:id
pub async fn toggle_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<FollowedStatus>> {
    let playlist_id = PlaylistId::new(id);
    let playlist = playlists::get_by_id(&app_state.pool, &playlist_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    if !playlist.is_visible_to(Some(auth.user_id())) {
        return Err(ServerError::Forbidden("This playlist is private".to_string()));
    }

    let is_followed =
        playlists::toggle_follow(&app_state.pool, &playlist_id, auth.user_id()).await?;

    Ok(Json(FollowedStatus {
        message: Some("Favorites updated".to_string()),
        is_followed,
    }))
}

/// GET /api/favorites/playlists/:id/check
pub async fn check_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<FollowedStatus>> {
    let playlist_id = PlaylistId::new(id);
    if playlists::get_by_id(&app_state.pool, &playlist_id).await?.is_none() {
        return Err(ServerError::NotFound("Playlist not found".to_string()));
    }

    let is_followed = playlists::is_followed(&app_state.pool, &playlist_id, auth.user_id()).await?;
    Ok(Json(FollowedStatus {
        message: None,
        is_followed,
    }))
}
