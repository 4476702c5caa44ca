/// File storage service - uploaded audio and cover images on disk
use crate::error::{Result, ServerError};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Prefix of every stored path, matching the `/uploads` static route
pub const STORED_PREFIX: &str = "uploads";

/// What an uploaded file is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Audio,
    Cover,
}

impl FileKind {
    pub fn subdirectory(&self) -> &'static str {
        match self {
            FileKind::Audio => "songs",
            FileKind::Cover => "covers",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Initialize storage directories
    pub async fn initialize(&self) -> Result<()> {
        for kind in [FileKind::Audio, FileKind::Cover] {
            fs::create_dir_all(self.base_path.join(kind.subdirectory())).await?;
        }
        Ok(())
    }

    /// Store an uploaded file
    ///
    /// Files are named `<field>-<uuid>.<ext>`. Returns the relative stored
    /// path, e.g. `uploads/songs/audio-<uuid>.mp3`.
    pub async fn store(
        &self,
        kind: FileKind,
        field: &str,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<String> {
        let extension = file_extension(original_name, content_type);
        let filename = format!("{}-{}.{}", field, Uuid::new_v4(), extension);

        let dir = self.base_path.join(kind.subdirectory());
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&filename), data).await?;

        tracing::debug!(kind = ?kind, file = %filename, bytes = data.len(), "Stored upload");
        Ok(format!("{}/{}/{}", STORED_PREFIX, kind.subdirectory(), filename))
    }

    /// Absolute location of a stored path
    ///
    /// Rejects anything that would escape the storage directory.
    pub fn resolve(&self, stored: &str) -> Result<PathBuf> {
        let normalized = stored.replace('\\', "/");
        let relative = normalized
            .strip_prefix(&format!("{STORED_PREFIX}/"))
            .unwrap_or(&normalized);
        let relative = Path::new(relative);

        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return Err(ServerError::Forbidden(
                "Path traversal attempt detected".to_string(),
            ));
        }

        Ok(self.base_path.join(relative))
    }

    /// Remove a stored file; missing files are ignored
    pub async fn delete(&self, stored: &str) -> Result<()> {
        let path = self.resolve(stored)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate that an existing path is within the storage directory
    pub fn validate_path(&self, path: &Path) -> Result<()> {
        let canonical_base = self
            .base_path
            .canonicalize()
            .map_err(|e| ServerError::Storage(format!("Invalid base path: {}", e)))?;

        let canonical_path = path
            .canonicalize()
            .map_err(|e| ServerError::Storage(format!("Invalid path: {}", e)))?;

        if !canonical_path.starts_with(&canonical_base) {
            return Err(ServerError::Forbidden(
                "Path traversal attempt detected".to_string(),
            ));
        }

        Ok(())
    }
}

/// Extension from the client's file name, else from its content type
fn file_extension(original_name: Option<&str>, content_type: Option<&str>) -> String {
    let from_name = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .filter(|ext| ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name
        .or_else(|| {
            content_type
                .and_then(mime_guess::get_mime_extensions_str)
                .and_then(|exts| exts.first())
                .map(|ext| (*ext).to_string())
        })
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_name_or_type() {
        assert_eq!(file_extension(Some("Track.MP3"), None), "mp3");
        assert_eq!(file_extension(Some("cover.png"), Some("image/jpeg")), "png");
        assert_eq!(file_extension(Some("no-extension"), None), "bin");
        assert_eq!(file_extension(Some("evil.p/hp"), None), "bin");
        assert_eq!(file_extension(None, Some("image/png")), "png");
    }

    #[tokio::test]
    async fn test_store_and_resolve() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_path_buf());
        storage.initialize().await.unwrap();

        let stored = storage
            .store(FileKind::Audio, "audio", Some("a.mp3"), None, b"fake audio data")
            .await
            .unwrap();

        assert!(stored.starts_with("uploads/songs/audio-"));
        assert!(stored.ends_with(".mp3"));
        assert!(storage.resolve(&stored).unwrap().exists());
    }
}
