/// Songs API routes
use super::PageParams;
use crate::{
    config::UploadSettings,
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::{FileKind, FileStorage},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use purestream_core::{parse_tags, NewSong, Pagination, Song, SongId, DEFAULT_SONG_DURATION};
use purestream_storage::songs::{self, SongFilter, SongSearch};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Slack on top of the per-file ceilings for the text fields and boundaries
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct ListSongsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub genre: Option<String>,
    pub artist: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchSongsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub q: Option<String>,
    pub genre: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SongResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub song: Song,
}

#[derive(Debug, Serialize)]
pub struct SongsResponse {
    pub songs: Vec<Song>,
}

#[derive(Debug, Serialize)]
pub struct SongPageResponse {
    pub songs: Vec<Song>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub genres: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub message: String,
    pub is_liked: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// A file part read from the upload form
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

/// Everything the upload form carried
#[derive(Default)]
struct UploadForm {
    audio: Option<UploadedFile>,
    cover: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

fn multipart_error(e: multer::Error) -> ServerError {
    match e {
        multer::Error::FieldSizeExceeded { field_name, .. } => ServerError::PayloadTooLarge(
            format!("File too large: {}", field_name.unwrap_or_default()),
        ),
        multer::Error::StreamSizeExceeded { .. } => {
            ServerError::PayloadTooLarge("Upload too large".to_string())
        }
        other => ServerError::BadRequest(format!("Failed to parse multipart: {}", other)),
    }
}

/// Read the upload form, enforcing the per-file ceilings while streaming
async fn read_upload_form(
    headers: &HeaderMap,
    body: Body,
    limits: UploadSettings,
) -> Result<UploadForm> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    if !content_type.starts_with("multipart/form-data") {
        return Err(ServerError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ServerError::BadRequest("Missing boundary".to_string()))?;

    let constraints = multer::Constraints::new().size_limit(
        multer::SizeLimit::new()
            .whole_stream(limits.max_audio_bytes + limits.max_image_bytes + FORM_OVERHEAD_BYTES)
            .for_field("audio", limits.max_audio_bytes)
            .for_field("coverImage", limits.max_image_bytes),
    );
    let mut multipart =
        multer::Multipart::with_constraints(body.into_data_stream(), boundary, constraints);

    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "audio" | "coverImage" => {
                let file = UploadedFile {
                    file_name: field.file_name().map(str::to_string),
                    content_type: field.content_type().map(|m| m.essence_str().to_string()),
                    data: field.bytes().await.map_err(multipart_error)?.to_vec(),
                };
                if name == "audio" {
                    form.audio = Some(file);
                } else {
                    form.cover = Some(file);
                }
            }
            _ => {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

/// POST /api/songs and /api/songs/upload
pub async fn upload_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, Json<SongResponse>)> {
    let form = read_upload_form(&headers, body, app_state.limits).await?;

    let audio = form
        .audio
        .as_ref()
        .filter(|f| !f.data.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Audio file is required".to_string()))?;

    let (Some(title), Some(artist)) = (form.text("title"), form.text("artist")) else {
        return Err(ServerError::BadRequest(
            "Title and artist are required".to_string(),
        ));
    };

    let release_year = form
        .text("releaseYear")
        .map(|y| {
            y.parse::<i32>()
                .map_err(|_| ServerError::BadRequest("Invalid release year".to_string()))
        })
        .transpose()?;

    let duration = form
        .text("duration")
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(DEFAULT_SONG_DURATION);

    let storage = &app_state.file_storage;
    let file_path = storage
        .store(
            FileKind::Audio,
            "audio",
            audio.file_name.as_deref(),
            audio.content_type.as_deref(),
            &audio.data,
        )
        .await?;

    let cover_image = match form.cover.as_ref().filter(|f| !f.data.is_empty()) {
        Some(cover) => {
            let stored = storage
                .store(
                    FileKind::Cover,
                    "coverImage",
                    cover.file_name.as_deref(),
                    cover.content_type.as_deref(),
                    &cover.data,
                )
                .await;
            match stored {
                Ok(path) => Some(path),
                Err(e) => {
                    discard_uploads(storage, [file_path]).await;
                    return Err(e);
                }
            }
        }
        None => None,
    };

    let new_song = NewSong {
        title,
        artist,
        album: form.text("album"),
        genre: form.text("genre"),
        duration,
        file_path: file_path.clone(),
        cover_image: cover_image.clone(),
        lyrics: form.text("lyrics"),
        release_year,
        tags: form.text("tags").map(|t| parse_tags(&t)).unwrap_or_default(),
        uploaded_by: auth.user_id().clone(),
        is_public: true,
    };

    let song = match songs::create(&app_state.pool, new_song).await {
        Ok(song) => song,
        Err(e) => {
            discard_uploads(storage, std::iter::once(file_path).chain(cover_image)).await;
            return Err(e.into());
        }
    };

    tracing::info!(song_id = %song.id, user_id = %auth.user_id(), "Song uploaded");

    Ok((
        StatusCode::CREATED,
        Json(SongResponse {
            message: Some("Song uploaded successfully".to_string()),
            song,
        }),
    ))
}

/// Remove files stored for an upload that did not complete
async fn discard_uploads(storage: &FileStorage, paths: impl IntoIterator<Item = String>) {
    for path in paths {
        if let Err(e) = storage.delete(&path).await {
            tracing::warn!(path = %path, error = %e, "Failed to remove upload");
        }
    }
}

/// GET /api/songs
pub async fn list_songs(
    State(app_state): State<AppState>,
    Query(query): Query<ListSongsQuery>,
) -> Result<Json<SongPageResponse>> {
    let (page, limit) = PageParams::new(query.page, query.limit).resolve(20);
    let filter = SongFilter {
        genre: query.genre,
        artist: query.artist,
    };

    let (songs, total) = songs::list_public(
        &app_state.pool,
        &filter,
        Pagination::offset(page, limit),
        i64::from(limit),
    )
    .await?;

    Ok(Json(SongPageResponse {
        songs,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// GET /api/songs/search
pub async fn search_songs(
    State(app_state): State<AppState>,
    Query(query): Query<SearchSongsQuery>,
) -> Result<Json<SongPageResponse>> {
    let (page, limit) = PageParams::new(query.page, query.limit).resolve(20);
    let search = SongSearch {
        q: query.q,
        genre: query.genre,
        artist: query.artist,
        album: query.album,
    };

    let (songs, total) = songs::search(
        &app_state.pool,
        &search,
        Pagination::offset(page, limit),
        i64::from(limit),
    )
    .await?;

    Ok(Json(SongPageResponse {
        songs,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// GET /api/songs/popular
pub async fn popular_songs(
    State(app_state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Result<Json<SongsResponse>> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(10)
        .min(super::MAX_PAGE_SIZE);
    let songs = songs::popular(&app_state.pool, i64::from(limit)).await?;
    Ok(Json(SongsResponse { songs }))
}

/// GET /api/songs/genres
pub async fn genres(State(app_state): State<AppState>) -> Result<Json<GenresResponse>> {
    let genres = songs::genres(&app_state.pool).await?;
    Ok(Json(GenresResponse { genres }))
}

/// GET /api/songs/:id
pub async fn get_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<SongResponse>> {
    let song = songs::get_by_id(&app_state.pool, &SongId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    Ok(Json(SongResponse {
        message: None,
        song,
    }))
}

/// POST /api/songs/:id/play
pub async fn record_play(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<MessageResponse>> {
    songs::increment_play_count(&app_state.pool, &SongId::new(id)).await?;

    Ok(Json(MessageResponse {
        message: "Play count updated".to_string(),
    }))
}

/// POST /api/songs/:id/like
pub async fn toggle_like(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<LikeResponse>> {
    let song_id = SongId::new(id);
    ensure_song_exists(&app_state, &song_id).await?;

    let is_liked = songs::toggle_like(&app_state.pool, &song_id, auth.user_id()).await?;

    Ok(Json(LikeResponse {
        message: "Like updated".to_string(),
        is_liked,
    }))
}

/// 404 unless the song exists
pub(crate) async fn ensure_song_exists(app_state: &AppState, id: &SongId) -> Result<()> {
    songs::get_by_id(&app_state.pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))
}
