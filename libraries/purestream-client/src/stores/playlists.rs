use super::report;
use crate::client::PureStreamClient;
use crate::error::Result;
use crate::types::{CreatePlaylistRequest, UpdatePlaylistRequest};
use purestream_core::{Playlist, PlaylistId, SongId};
use purestream_playback::Notifications;
use std::sync::Arc;
use tokio::sync::watch;

/// Playlists the user owns or collaborates on
#[derive(Clone)]
pub struct PlaylistStore {
    client: PureStreamClient,
    notifications: Notifications,
    playlists: Arc<watch::Sender<Vec<Playlist>>>,
}

impl PlaylistStore {
    pub fn new(client: PureStreamClient, notifications: Notifications) -> Self {
        let (playlists, _) = watch::channel(Vec::new());
        Self {
            client,
            notifications,
            playlists: Arc::new(playlists),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Playlist>> {
        self.playlists.subscribe()
    }

    pub fn playlists(&self) -> Vec<Playlist> {
        self.playlists.borrow().clone()
    }

    pub async fn load(&self) -> Result<()> {
        let result = self.client.playlists().mine().await;
        let playlists = report(&self.notifications, result)?;
        tracing::debug!(count = playlists.len(), "Loaded playlists");
        self.playlists.send_replace(playlists);
        Ok(())
    }

    pub async fn create(&self, playlist: &CreatePlaylistRequest) -> Result<Playlist> {
        let result = self.client.playlists().create(playlist).await;
        let created = report(&self.notifications, result)?;
        self.load().await?;
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &PlaylistId,
        update: &UpdatePlaylistRequest,
    ) -> Result<Playlist> {
        let result = self.client.playlists().update(id, update).await;
        let updated = report(&self.notifications, result)?;
        self.load().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &PlaylistId) -> Result<()> {
        let result = self.client.playlists().delete(id).await;
        report(&self.notifications, result)?;
        self.load().await
    }

    pub async fn add_song(&self, id: &PlaylistId, song_id: &SongId) -> Result<()> {
        let result = self.client.playlists().add_song(id, song_id).await;
        report(&self.notifications, result)?;
        self.load().await
    }

    pub async fn remove_song(&self, id: &PlaylistId, song_id: &SongId) -> Result<()> {
        let result = self.client.playlists().remove_song(id, song_id).await;
        report(&self.notifications, result)?;
        self.load().await
    }

    pub async fn reorder(&self, id: &PlaylistId, song_ids: &[SongId]) -> Result<()> {
        let result = self.client.playlists().reorder(id, song_ids).await;
        report(&self.notifications, result)?;
        self.load().await
    }
}
