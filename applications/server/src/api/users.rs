/// Users API routes
use super::PageParams;
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use purestream_core::{Pagination, Playlist, Song, SongId, User, UserId};
use purestream_storage::{playlists, songs, users};
use serde::{Deserialize, Serialize};

/// Popular public playlists included in recommendations
const RECOMMENDED_PLAYLISTS: i64 = 10;

/// Users sharing a genre included in recommendations
const RECOMMENDED_USERS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchUsersQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub songs: Vec<Song>,
    pub playlists: Vec<Playlist>,
    pub users_to_follow: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserPageResponse {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub message: String,
    pub is_following: bool,
}

#[derive(Debug, Serialize)]
pub struct FollowingResponse {
    pub following: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct FollowersResponse {
    pub followers: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistsResponse {
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Serialize)]
pub struct SongsResponse {
    pub songs: Vec<Song>,
}

async fn load_user(app_state: &AppState, id: &UserId) -> Result<User> {
    users::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))
}

/// GET /api/users/recommendations
///
/// Songs come from the caller's favourite genres first, topped up with
/// globally popular songs until `limit` is reached.
pub async fn recommendations(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<RecommendationsQuery>,
) -> Result<Json<RecommendationsResponse>> {
    let user = load_user(&app_state, auth.user_id()).await?;
    let limit = i64::from(query.limit.filter(|l| *l > 0).unwrap_or(20).min(super::MAX_PAGE_SIZE));
    let genres = &user.favorite_genres;

    let mut songs = songs::popular_in_genres(&app_state.pool, genres, limit).await?;

    let missing = limit - songs.len() as i64;
    if missing > 0 {
        let picked: Vec<SongId> = songs.iter().map(|s| s.id.clone()).collect();
        let filler = songs::popular_excluding(&app_state.pool, &picked, missing).await?;
        songs.extend(filler);
    }

    let playlists = playlists::popular(&app_state.pool, RECOMMENDED_PLAYLISTS).await?;
    let users_to_follow =
        users::sharing_genres(&app_state.pool, &user.id, genres, RECOMMENDED_USERS).await?;

    Ok(Json(RecommendationsResponse {
        songs,
        playlists,
        users_to_follow,
    }))
}

/// GET /api/users/search
/// Matches username or bio, most followed first
pub async fn search_users(
    State(app_state): State<AppState>,
    Query(query): Query<SearchUsersQuery>,
) -> Result<Json<UserPageResponse>> {
    let (page, limit) = PageParams::new(query.page, query.limit).resolve(20);
    let q = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let (users, total) = users::search(
        &app_state.pool,
        q,
        Pagination::offset(page, limit),
        i64::from(limit),
    )
    .await?;

    Ok(Json(UserPageResponse {
        users,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// GET /api/users/:id
pub async fn get_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<UserResponse>> {
    let user = load_user(&app_state, &UserId::new(id)).await?;
    Ok(Json(UserResponse { user }))
}

/// POST /api/users/:id/follow
pub async fn toggle_follow(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<FollowResponse>> {
    let target = UserId::new(id);
    if target == *auth.user_id() {
        return Err(ServerError::BadRequest("You cannot follow yourself".to_string()));
    }
    load_user(&app_state, &target).await?;

    let is_following = users::toggle_follow(&app_state.pool, auth.user_id(), &target).await?;

    Ok(Json(FollowResponse {
        message: if is_following {
            "User followed".to_string()
        } else {
            "User unfollowed".to_string()
        },
        is_following,
    }))
}

/// GET /api/users/:id/following
pub async fn following(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<FollowingResponse>> {
    let user_id = UserId::new(id);
    load_user(&app_state, &user_id).await?;

    let following = users::following(&app_state.pool, &user_id).await?;
    Ok(Json(FollowingResponse { following }))
}

/// GET /api/users/:id/followers
pub async fn followers(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<FollowersResponse>> {
    let user_id = UserId::new(id);
    load_user(&app_state, &user_id).await?;

    let followers = users::followers(&app_state.pool, &user_id).await?;
    Ok(Json(FollowersResponse { followers }))
}

/// GET /api/users/:id/playlists
pub async fn user_playlists(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<PlaylistsResponse>> {
    let playlists = playlists::public_by_owner(&app_state.pool, &UserId::new(id)).await?;
    Ok(Json(PlaylistsResponse { playlists }))
}

/// GET /api/users/:id/songs
pub async fn user_songs(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<SongsResponse>> {
    let songs = songs::by_uploader(&app_state.pool, &UserId::new(id)).await?;
    Ok(Json(SongsResponse { songs }))
}
