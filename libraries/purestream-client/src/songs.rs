//! Song endpoints and upload validation.

use crate::client::PureStreamClient;
use crate::error::{ClientError, Result};
use crate::types::{
    GenresEnvelope, LikeStatus, SearchQuery, SongEnvelope, SongPage, SongQuery, SongUpload,
    SongsEnvelope,
};
use purestream_core::{Song, SongId};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;
use tracing::{debug, info};

/// Largest audio file the server accepts
pub const MAX_AUDIO_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

const ALLOWED_AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/wav",
    "audio/flac",
    "audio/aac",
    "audio/mp4",
];

const ALLOWED_AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".wav", ".flac", ".aac", ".m4a"];

/// Check an audio file before uploading it
///
/// The file must be at most [`MAX_AUDIO_UPLOAD_BYTES`] and have either an
/// accepted content type or an accepted extension.
pub fn validate_audio_upload(file_name: &str, content_type: Option<&str>, size: u64) -> Result<()> {
    if size > MAX_AUDIO_UPLOAD_BYTES {
        return Err(ClientError::InvalidUpload(format!(
            "{file_name} is too large (max 50MB)"
        )));
    }

    let lower = file_name.to_lowercase();
    let type_ok = content_type.is_some_and(|t| ALLOWED_AUDIO_TYPES.contains(&t));
    let extension_ok = ALLOWED_AUDIO_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(ext));

    if !type_ok && !extension_ok {
        return Err(ClientError::InvalidUpload(format!(
            "{file_name} is not a supported audio format"
        )));
    }
    Ok(())
}

/// Song endpoints of a [`PureStreamClient`].
pub struct SongsClient<'a> {
    client: &'a PureStreamClient,
}

impl<'a> SongsClient<'a> {
    pub(crate) fn new(client: &'a PureStreamClient) -> Self {
        Self { client }
    }

    /// Public songs, newest first
    pub async fn list(&self, query: &SongQuery) -> Result<SongPage> {
        let request = self.client.request(Method::GET, "/songs").await;
        self.client.send(request.query(query)).await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SongPage> {
        let request = self.client.request(Method::GET, "/songs/search").await;
        self.client.send(request.query(query)).await
    }

    /// Most played songs
    pub async fn popular(&self, limit: u32) -> Result<Vec<Song>> {
        let request = self.client.request(Method::GET, "/songs/popular").await;
        let envelope: SongsEnvelope = self.client.send(request.query(&[("limit", limit)])).await?;
        Ok(envelope.songs)
    }

    pub async fn genres(&self) -> Result<Vec<String>> {
        let request = self.client.request(Method::GET, "/songs/genres").await;
        let envelope: GenresEnvelope = self.client.send(request).await?;
        Ok(envelope.genres)
    }

    pub async fn get(&self, id: &SongId) -> Result<Song> {
        let path = format!("/songs/{id}");
        let request = self.client.request(Method::GET, &path).await;
        let envelope: SongEnvelope = self.client.send(request).await?;
        Ok(envelope.song)
    }

    /// Count one play of the song
    pub async fn record_play(&self, id: &SongId) -> Result<()> {
        let path = format!("/songs/{id}/play");
        let request = self.client.request(Method::POST, &path).await;
        self.client.send_empty(request).await
    }

    /// Like or unlike; returns whether the song is now liked
    pub async fn toggle_like(&self, id: &SongId) -> Result<bool> {
        let path = format!("/songs/{id}/like");
        let request = self.client.request(Method::POST, &path).await;
        let status: LikeStatus = self.client.send(request).await?;
        Ok(status.is_liked)
    }

    /// Upload an audio file with its metadata
    ///
    /// The file is validated locally first; nothing is sent when it is too
    /// large or not a supported format.
    pub async fn upload(&self, upload: &SongUpload) -> Result<Song> {
        let size = match tokio::fs::metadata(&upload.audio).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ClientError::FileNotFound(upload.audio.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        validate_audio_upload(
            &file_name(&upload.audio),
            mime_type_for_file(&upload.audio),
            size,
        )?;
        let audio = read_part(&upload.audio).await?;

        let mut form = Form::new()
            .part("audio", audio.into_part()?)
            .text("title", upload.title.clone())
            .text("artist", upload.artist.clone());

        if let Some(cover) = &upload.cover_image {
            form = form.part("coverImage", read_part(cover).await?.into_part()?);
        }
        if let Some(album) = &upload.album {
            form = form.text("album", album.clone());
        }
        if let Some(genre) = &upload.genre {
            form = form.text("genre", genre.clone());
        }
        if let Some(year) = upload.release_year {
            form = form.text("releaseYear", year.to_string());
        }
        if let Some(lyrics) = &upload.lyrics {
            form = form.text("lyrics", lyrics.clone());
        }
        if !upload.tags.is_empty() {
            form = form.text("tags", upload.tags.join(","));
        }
        if let Some(duration) = upload.duration {
            form = form.text("duration", duration.to_string());
        }

        debug!(file = %upload.audio.display(), "Uploading song");
        let request = self.client.request(Method::POST, "/songs/upload").await;
        let envelope: SongEnvelope = self.client.send(request.multipart(form)).await?;

        info!(song_id = %envelope.song.id, title = %envelope.song.title, "Song uploaded");
        Ok(envelope.song)
    }
}

struct FilePart {
    file_name: String,
    mime: Option<&'static str>,
    bytes: Vec<u8>,
}

impl FilePart {
    fn into_part(self) -> Result<Part> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.mime {
            Some(mime) => Ok(part.mime_str(mime)?),
            None => Ok(part),
        }
    }
}

async fn read_part(path: &Path) -> Result<FilePart> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(ClientError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path).await?;

    Ok(FilePart {
        file_name: file_name(path),
        mime: mime_type_for_file(path),
        bytes,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string()
}

/// MIME type for upload parts, by extension
fn mime_type_for_file(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "m4a" => "audio/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_by_type_or_extension() {
        assert!(validate_audio_upload("track.mp3", None, 1024).is_ok());
        assert!(validate_audio_upload("TRACK.FLAC", None, 1024).is_ok());
        assert!(validate_audio_upload("track.bin", Some("audio/wav"), 1024).is_ok());
    }

    #[test]
    fn test_rejects_unknown_format() {
        let err = validate_audio_upload("notes.txt", Some("text/plain"), 10).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUpload(_)));
    }

    #[test]
    fn test_rejects_oversized_file() {
        assert!(validate_audio_upload("big.mp3", None, MAX_AUDIO_UPLOAD_BYTES).is_ok());
        let err = validate_audio_upload("big.mp3", None, MAX_AUDIO_UPLOAD_BYTES + 1).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for_file(Path::new("a.mp3")), Some("audio/mpeg"));
        assert_eq!(mime_type_for_file(Path::new("a.M4A")), Some("audio/mp4"));
        assert_eq!(mime_type_for_file(Path::new("cover.jpg")), Some("image/jpeg"));
        assert_eq!(mime_type_for_file(Path::new("a.unknown")), None);
    }
}
