//! Integration tests for playlists vertical slice
//!
//! Tests playlist operations including:
//! - CRUD with user ownership
//! - Collaborator membership
//! - Song ordering, reordering and duration bookkeeping
//! - Following


use purestream_core::*;
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;

    let playlist = purestream_storage::playlists::create(
        pool,
        NewPlaylist {
            name: "Road Trip".to_string(),
            description: "Long drives".to_string(),
            owner_id: alice.id.clone(),
            is_public: true,
            is_collaborative: false,
            tags: vec!["driving".to_string()],
        },
    )
    .await
    .expect("Failed to create playlist");

    assert_eq!(playlist.name, "Road Trip");
    assert_eq!(playlist.owner.id, alice.id);
    assert_eq!(playlist.owner.username, "alice");
    assert_eq!(playlist.tags, vec!["driving"]);
    assert!(playlist.songs.is_empty());
    assert_eq!(playlist.total_duration, 0.0);

    let retrieved = purestream_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(retrieved.id, playlist.id);
}

#[tokio::test]
async fn test_add_song_recalculates_duration() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let playlist = create_test_playlist(pool, "Mix", &alice.id, true).await;
    let one = create_test_song(pool, "One", "A", None, 120.0, &alice.id).await;
    let two = create_test_song(pool, "Two", "A", None, 95.5, &alice.id).await;

    assert!(
        purestream_storage::playlists::add_song(pool, &playlist.id, &one.id, &alice.id)
            .await
            .unwrap()
    );
    assert!(
        purestream_storage::playlists::add_song(pool, &playlist.id, &two.id, &alice.id)
            .await
            .unwrap()
    );

    let full = purestream_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(full.song_count, 2);
    assert_eq!(full.total_duration, 215.5);
    assert_eq!(full.songs[0].song.id, one.id);
    assert_eq!(full.songs[1].song.id, two.id);
    assert_eq!(full.songs[0].added_by.username, "alice");
}

#[tokio::test]
async fn test_add_duplicate_song_is_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let playlist = create_test_playlist(pool, "Mix", &alice.id, true).await;
    let one = create_test_song(pool, "One", "A", None, 120.0, &alice.id).await;

    purestream_storage::playlists::add_song(pool, &playlist.id, &one.id, &alice.id)
        .await
        .unwrap();
    let added_again =
        purestream_storage::playlists::add_song(pool, &playlist.id, &one.id, &alice.id)
            .await
            .unwrap();
    assert!(!added_again);

    let full = purestream_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(full.songs.len(), 1);
    assert_eq!(full.total_duration, 120.0);
}

#[tokio::test]
async fn test_remove_song_recalculates_duration() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let playlist = create_test_playlist(pool, "Mix", &alice.id, true).await;
    let one = create_test_song(pool, "One", "A", None, 120.0, &alice.id).await;
    let two = create_test_song(pool, "Two", "A", None, 60.0, &alice.id).await;

    for song in [&one, &two] {
        purestream_storage::playlists::add_song(pool, &playlist.id, &song.id, &alice.id)
            .await
            .unwrap();
    }

    let removed = purestream_storage::playlists::remove_song(pool, &playlist.id, &one.id)
        .await
        .unwrap();
    assert!(removed);

    let full = purestream_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(full.songs.len(), 1);
    assert_eq!(full.total_duration, 60.0);
}

#[tokio::test]
async fn test_reorder_keeps_only_known_songs() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let playlist = create_test_playlist(pool, "Mix", &alice.id, true).await;
    let one = create_test_song(pool, "One", "A", None, 10.0, &alice.id).await;
    let two = create_test_song(pool, "Two", "A", None, 20.0, &alice.id).await;
    let three = create_test_song(pool, "Three", "A", None, 30.0, &alice.id).await;
    let outsider = create_test_song(pool, "Outsider", "A", None, 40.0, &alice.id).await;

    for song in [&one, &two, &three] {
        purestream_storage::playlists::add_song(pool, &playlist.id, &song.id, &alice.id)
            .await
            .unwrap();
    }

    // `one` is left out, `outsider` was never added
    purestream_storage::playlists::reorder(
        pool,
        &playlist.id,
        &[three.id.clone(), outsider.id.clone(), two.id.clone()],
    )
    .await
    .unwrap();

    let full = purestream_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .unwrap();
    let order: Vec<_> = full.songs.iter().map(|e| e.song.id.clone()).collect();
    assert_eq!(order, vec![three.id, two.id]);
    assert_eq!(full.total_duration, 50.0);
}

#[tokio::test]
async fn test_update_is_partial() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let playlist = create_test_playlist(pool, "Mix", &alice.id, true).await;

    let updated = purestream_storage::playlists::update(
        pool,
        &playlist.id,
        UpdatePlaylist {
            description: Some("Updated".to_string()),
            is_public: Some(false),
            ..UpdatePlaylist::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Mix");
    assert_eq!(updated.description, "Updated");
    assert!(!updated.is_public);
}

#[tokio::test]
async fn test_for_member_includes_collaborations() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let bob = create_test_user(pool, "bob").await;

    let own = create_test_playlist(pool, "Bob's", &bob.id, false).await;
    let shared = create_test_playlist(pool, "Alice's", &alice.id, false).await;
    create_test_playlist(pool, "Alice only", &alice.id, false).await;

    purestream_storage::playlists::add_collaborator(pool, &shared.id, &bob.id)
        .await
        .unwrap();

    let playlists = purestream_storage::playlists::for_member(pool, &bob.id)
        .await
        .unwrap();
    let ids: Vec<_> = playlists.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&own.id));
    assert!(ids.contains(&shared.id));

    let shared_full = playlists.iter().find(|p| p.id == shared.id).unwrap();
    assert!(shared_full.can_edit(&bob.id));
}

#[tokio::test]
async fn test_list_public_hides_private() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    create_test_playlist(pool, "Public", &alice.id, true).await;
    create_test_playlist(pool, "Private", &alice.id, false).await;

    let (playlists, total) = purestream_storage::playlists::list_public(pool, 0, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(playlists[0].name, "Public");

    let owned = purestream_storage::playlists::public_by_owner(pool, &alice.id)
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
}

#[tokio::test]
async fn test_follow_toggle() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let bob = create_test_user(pool, "bob").await;
    let playlist = create_test_playlist(pool, "Mix", &alice.id, true).await;

    assert!(
        purestream_storage::playlists::toggle_follow(pool, &playlist.id, &bob.id)
            .await
            .unwrap()
    );
    let followed = purestream_storage::playlists::followed_by(pool, &bob.id)
        .await
        .unwrap();
    assert_eq!(followed.len(), 1);
    assert_eq!(followed[0].followers, 1);

    assert!(
        !purestream_storage::playlists::toggle_follow(pool, &playlist.id, &bob.id)
            .await
            .unwrap()
    );
    assert!(
        !purestream_storage::playlists::is_followed(pool, &playlist.id, &bob.id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_delete_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, "alice").await;
    let playlist = create_test_playlist(pool, "Mix", &alice.id, true).await;
    let song = create_test_song(pool, "One", "A", None, 10.0, &alice.id).await;
    purestream_storage::playlists::add_song(pool, &playlist.id, &song.id, &alice.id)
        .await
        .unwrap();

    purestream_storage::playlists::delete(pool, &playlist.id)
        .await
        .unwrap();

    assert!(purestream_storage::playlists::get_by_id(pool, &playlist.id)
        .await
        .unwrap()
        .is_none());

    let again = purestream_storage::playlists::delete(pool, &playlist.id).await;
    assert!(matches!(again, Err(CoreError::NotFound { .. })));

    // The song itself survives
    assert!(purestream_storage::songs::get_by_id(pool, &song.id)
        .await
        .unwrap()
        .is_some());
}
