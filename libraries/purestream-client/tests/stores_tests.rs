//! Tests for the cached stores and the play reporter

mod common;

use common::*;
use purestream_client::{ApiPlayReporter, CreatePlaylistRequest, FavoritesStore, PlaylistStore};
use purestream_core::{PlaylistId, SongId};
use purestream_playback::{NotificationKind, Notifications, PlayCountReporter};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_favorite_songs(server: &MockServer, songs: serde_json::Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/favorites/songs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "songs": songs })))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

async fn mount_followed_playlists(server: &MockServer, playlists: serde_json::Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/favorites/playlists"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "playlists": playlists })),
        )
        .up_to_n_times(times)
        .mount(server)
        .await;
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn test_load_publishes_both_lists() {
    let server = MockServer::start().await;
    mount_favorite_songs(&server, json!([song_json("s1", "So What")]), 1).await;
    mount_followed_playlists(&server, json!([playlist_json("p1", "Modal")]), 1).await;

    let store = FavoritesStore::new(client_for(&server), Notifications::new());
    let mut songs_rx = store.subscribe_songs();

    store.load().await.unwrap();

    assert!(songs_rx.has_changed().unwrap());
    assert_eq!(songs_rx.borrow_and_update().len(), 1);
    assert!(store.is_favorite(&SongId::new("s1")));
    assert!(store.is_following_playlist(&PlaylistId::new("p1")));
}

#[tokio::test]
async fn test_toggle_adds_when_not_cached_then_reloads() {
    let server = MockServer::start().await;
    mount_favorite_songs(&server, json!([]), 1).await;
    mount_followed_playlists(&server, json!([]), 1).await;
    mount_favorite_songs(&server, json!([song_json("s1", "So What")]), 1).await;

    Mock::given(method("PUT"))
        .and(path("/api/favorites/songs/s1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Song added", "isLiked": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = FavoritesStore::new(client_for(&server), Notifications::new());
    store.load().await.unwrap();
    assert!(!store.is_favorite(&SongId::new("s1")));

    let now_favorite = store.toggle_favorite(&SongId::new("s1")).await.unwrap();

    assert!(now_favorite);
    assert!(store.is_favorite(&SongId::new("s1")));
}

#[tokio::test]
async fn test_toggle_removes_when_cached() {
    let server = MockServer::start().await;
    mount_favorite_songs(&server, json!([song_json("s1", "So What")]), 1).await;
    mount_followed_playlists(&server, json!([]), 1).await;
    mount_favorite_songs(&server, json!([]), 1).await;

    Mock::given(method("DELETE"))
        .and(path("/api/favorites/songs/s1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Song removed", "isLiked": false })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = FavoritesStore::new(client_for(&server), Notifications::new());
    store.load().await.unwrap();

    let now_favorite = store.toggle_favorite(&SongId::new("s1")).await.unwrap();

    assert!(!now_favorite);
    assert!(store.songs().is_empty());
}

#[tokio::test]
async fn test_failed_mutation_notifies_and_keeps_cache() {
    let server = MockServer::start().await;
    mount_favorite_songs(&server, json!([song_json("s1", "So What")]), 1).await;
    mount_followed_playlists(&server, json!([]), 1).await;

    Mock::given(method("DELETE"))
        .and(path("/api/favorites/songs/s1"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Database unavailable" })),
        )
        .mount(&server)
        .await;

    let notifications = Notifications::new();
    let store = FavoritesStore::new(client_for(&server), notifications.clone());
    store.load().await.unwrap();

    assert!(store.remove_song(&SongId::new("s1")).await.is_err());

    assert!(store.is_favorite(&SongId::new("s1")));
    let posted = notifications.current();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].kind, NotificationKind::Error);
    assert!(posted[0].message.contains("Database unavailable"));
}

#[tokio::test]
async fn test_toggle_playlist_follow_reloads() {
    let server = MockServer::start().await;
    mount_followed_playlists(&server, json!([playlist_json("p1", "Modal")]), 1).await;

    Mock::given(method("POST"))
        .and(path("/api/favorites/playlists/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Playlist followed",
            "isFollowed": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = FavoritesStore::new(client_for(&server), Notifications::new());
    let followed = store
        .toggle_playlist_follow(&PlaylistId::new("p1"))
        .await
        .unwrap();

    assert!(followed);
    assert!(store.is_following_playlist(&PlaylistId::new("p1")));
}

// =============================================================================
// Playlists
// =============================================================================

#[tokio::test]
async fn test_create_reloads_my_playlists() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Playlist created",
            "playlist": playlist_json("p2", "Road Trip")
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/playlists/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playlists": [playlist_json("p1", "Modal"), playlist_json("p2", "Road Trip")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = PlaylistStore::new(client_for(&server), Notifications::new());
    let mut rx = store.subscribe();

    let created = store
        .create(&CreatePlaylistRequest::named("Road Trip"))
        .await
        .unwrap();

    assert_eq!(created.id, PlaylistId::new("p2"));
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().len(), 2);
}

#[tokio::test]
async fn test_failed_reload_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/playlists/my"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let notifications = Notifications::new();
    let store = PlaylistStore::new(anonymous_client(&server), notifications.clone());

    assert!(store.load().await.is_err());
    assert!(store.playlists().is_empty());
    assert_eq!(notifications.current().len(), 1);
}

// =============================================================================
// Play reporter
// =============================================================================

#[tokio::test]
async fn test_reporter_posts_play_in_background() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/songs/s1/play"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let reporter = ApiPlayReporter::new(client_for(&server));
    reporter.record_play(&SongId::new("s1"));

    for _ in 0..50 {
        if !server.received_requests().await.unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[test]
fn test_reporter_without_runtime_is_silent() {
    let client = purestream_client::PureStreamClient::new(purestream_client::ClientConfig::new(
        "http://localhost:3000",
    ))
    .unwrap();

    ApiPlayReporter::new(client).record_play(&SongId::new("s1"));
}
