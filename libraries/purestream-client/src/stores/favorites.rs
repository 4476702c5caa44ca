use super::report;
use crate::client::PureStreamClient;
use crate::error::Result;
use purestream_core::{Playlist, PlaylistId, Song, SongId};
use purestream_playback::Notifications;
use std::sync::Arc;
use tokio::sync::watch;

/// The user's favorite songs and followed playlists
#[derive(Clone)]
pub struct FavoritesStore {
    client: PureStreamClient,
    notifications: Notifications,
    songs: Arc<watch::Sender<Vec<Song>>>,
    playlists: Arc<watch::Sender<Vec<Playlist>>>,
}

impl FavoritesStore {
    pub fn new(client: PureStreamClient, notifications: Notifications) -> Self {
        let (songs, _) = watch::channel(Vec::new());
        let (playlists, _) = watch::channel(Vec::new());
        Self {
            client,
            notifications,
            songs: Arc::new(songs),
            playlists: Arc::new(playlists),
        }
    }

    pub fn subscribe_songs(&self) -> watch::Receiver<Vec<Song>> {
        self.songs.subscribe()
    }

    pub fn subscribe_playlists(&self) -> watch::Receiver<Vec<Playlist>> {
        self.playlists.subscribe()
    }

    /// Cached favorite songs
    pub fn songs(&self) -> Vec<Song> {
        self.songs.borrow().clone()
    }

    /// Cached followed playlists
    pub fn playlists(&self) -> Vec<Playlist> {
        self.playlists.borrow().clone()
    }

    /// Fetch both lists from the server
    pub async fn load(&self) -> Result<()> {
        self.reload_songs().await?;
        self.reload_playlists().await
    }

    pub async fn add_song(&self, id: &SongId) -> Result<()> {
        let result = self.client.favorites().add_song(id).await;
        report(&self.notifications, result)?;
        self.reload_songs().await
    }

    pub async fn remove_song(&self, id: &SongId) -> Result<()> {
        let result = self.client.favorites().remove_song(id).await;
        report(&self.notifications, result)?;
        self.reload_songs().await
    }

    /// Add or remove depending on the cached list; returns the new state
    pub async fn toggle_favorite(&self, id: &SongId) -> Result<bool> {
        if self.is_favorite(id) {
            self.remove_song(id).await?;
            Ok(false)
        } else {
            self.add_song(id).await?;
            Ok(true)
        }
    }

    pub fn is_favorite(&self, id: &SongId) -> bool {
        self.songs.borrow().iter().any(|song| &song.id == id)
    }

    /// Returns whether the playlist is now followed
    pub async fn toggle_playlist_follow(&self, id: &PlaylistId) -> Result<bool> {
        let result = self.client.favorites().toggle_playlist(id).await;
        let followed = report(&self.notifications, result)?;
        self.reload_playlists().await?;
        Ok(followed)
    }

    pub fn is_following_playlist(&self, id: &PlaylistId) -> bool {
        self.playlists.borrow().iter().any(|playlist| &playlist.id == id)
    }

    async fn reload_songs(&self) -> Result<()> {
        let result = self.client.favorites().songs().await;
        let songs = report(&self.notifications, result)?;
        self.songs.send_replace(songs);
        Ok(())
    }

    async fn reload_playlists(&self) -> Result<()> {
        let result = self.client.favorites().playlists().await;
        let playlists = report(&self.notifications, result)?;
        self.playlists.send_replace(playlists);
        Ok(())
    }
}
