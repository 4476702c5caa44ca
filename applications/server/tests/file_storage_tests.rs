/// File storage service tests
/// Tests upload layout, naming, deletion and path validation
use purestream_server::services::{FileKind, FileStorage};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

async fn create_storage() -> (FileStorage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path().to_path_buf());
    storage.initialize().await.unwrap();
    (storage, temp_dir)
}

#[tokio::test]
async fn test_file_storage_initialization() {
    let (_storage, temp_dir) = create_storage().await;

    assert!(temp_dir.path().join("songs").is_dir());
    assert!(temp_dir.path().join("covers").is_dir());
}

#[tokio::test]
async fn test_store_audio_and_cover() {
    let (storage, temp_dir) = create_storage().await;

    let audio = storage
        .store(FileKind::Audio, "audio", Some("Track.FLAC"), Some("audio/flac"), b"fLaC")
        .await
        .unwrap();
    let cover = storage
        .store(FileKind::Cover, "coverImage", None, Some("image/png"), b"\x89PNG")
        .await
        .unwrap();

    assert!(audio.starts_with("uploads/songs/audio-"));
    assert!(audio.ends_with(".flac"));
    assert!(cover.starts_with("uploads/covers/coverImage-"));
    assert!(cover.ends_with(".png"));

    let on_disk = temp_dir
        .path()
        .join(audio.trim_start_matches("uploads/"));
    assert_eq!(std::fs::read(on_disk).unwrap(), b"fLaC");
}

#[tokio::test]
async fn test_delete_removes_file_and_ignores_missing() {
    let (storage, _temp_dir) = create_storage().await;

    let stored = storage
        .store(FileKind::Audio, "audio", Some("a.mp3"), None, b"data")
        .await
        .unwrap();
    let path = storage.resolve(&stored).unwrap();
    assert!(path.exists());

    storage.delete(&stored).await.unwrap();
    assert!(!path.exists());

    storage.delete(&stored).await.unwrap();
}

#[tokio::test]
async fn test_resolve_rejects_traversal() {
    let (storage, _temp_dir) = create_storage().await;

    assert!(storage.resolve("uploads/../secret.txt").is_err());
    assert!(storage.resolve("../../etc/passwd").is_err());
    assert!(storage.resolve("/etc/passwd").is_err());
    assert!(storage.resolve("uploads/songs/..\\..\\x").is_err());
    assert!(storage.resolve("").is_err());
    assert!(storage.resolve("uploads/songs/audio-1.mp3").is_ok());
}

#[tokio::test]
async fn test_path_validation() {
    let (storage, temp_dir) = create_storage().await;

    let stored = storage
        .store(FileKind::Audio, "audio", Some("a.mp3"), None, b"data")
        .await
        .unwrap();
    assert!(storage.validate_path(&storage.resolve(&stored).unwrap()).is_ok());

    let outside = TempDir::new().unwrap();
    let outside_file = outside.path().join("other.mp3");
    std::fs::write(&outside_file, b"data").unwrap();
    assert!(storage.validate_path(&outside_file).is_err());

    let sneaky = temp_dir.path().join("songs/../../");
    assert!(storage.validate_path(&sneaky).is_err());
}

#[tokio::test]
async fn test_concurrent_stores_get_unique_names() {
    let (storage, _temp_dir) = create_storage().await;
    let storage = Arc::new(storage);

    let mut handles = vec![];
    for i in 0..10 {
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            storage
                .store(FileKind::Audio, "audio", Some("same.mp3"), None, &[i as u8])
                .await
                .unwrap()
        }));
    }

    let mut names = HashSet::new();
    for handle in handles {
        names.insert(handle.await.unwrap());
    }
    assert_eq!(names.len(), 10);
}
