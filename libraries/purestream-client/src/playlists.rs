//! Playlist endpoints.

use crate::client::PureStreamClient;
use crate::error::Result;
use crate::types::{
    CreatePlaylistRequest, FollowingStatus, PlaylistEnvelope, PlaylistPage, PlaylistsEnvelope,
    UpdatePlaylistRequest,
};
use purestream_core::{Playlist, PlaylistId, SongId};
use reqwest::Method;
use serde_json::json;

/// Playlist endpoints of a [`PureStreamClient`].
pub struct PlaylistsClient<'a> {
    client: &'a PureStreamClient,
}

impl<'a> PlaylistsClient<'a> {
    pub(crate) fn new(client: &'a PureStreamClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, playlist: &CreatePlaylistRequest) -> Result<Playlist> {
        let request = self.client.request(Method::POST, "/playlists").await;
        let envelope: PlaylistEnvelope = self.client.send(request.json(playlist)).await?;
        Ok(envelope.playlist)
    }

    /// Playlists the user owns or collaborates on
    pub async fn mine(&self) -> Result<Vec<Playlist>> {
        let request = self.client.request(Method::GET, "/playlists/my").await;
        let envelope: PlaylistsEnvelope = self.client.send(request).await?;
        Ok(envelope.playlists)
    }

    pub async fn public(&self, page: u32, limit: u32) -> Result<PlaylistPage> {
        let request = self.client.request(Method::GET, "/playlists/public").await;
        self.client
            .send(request.query(&[("page", page), ("limit", limit)]))
            .await
    }

    pub async fn get(&self, id: &PlaylistId) -> Result<Playlist> {
        let path = format!("/playlists/{id}");
        let request = self.client.request(Method::GET, &path).await;
        let envelope: PlaylistEnvelope = self.client.send(request).await?;
        Ok(envelope.playlist)
    }

    pub async fn update(&self, id: &PlaylistId, update: &UpdatePlaylistRequest) -> Result<Playlist> {
        let path = format!("/playlists/{id}");
        let request = self.client.request(Method::PUT, &path).await;
        let envelope: PlaylistEnvelope = self.client.send(request.json(update)).await?;
        Ok(envelope.playlist)
    }

    pub async fn add_song(&self, id: &PlaylistId, song_id: &SongId) -> Result<Playlist> {
        let path = format!("/playlists/{id}/songs");
        let request = self.client.request(Method::POST, &path).await;
        let envelope: PlaylistEnvelope = self
            .client
            .send(request.json(&json!({ "songId": song_id })))
            .await?;
        Ok(envelope.playlist)
    }

    pub async fn remove_song(&self, id: &PlaylistId, song_id: &SongId) -> Result<Playlist> {
        let path = format!("/playlists/{id}/songs/{song_id}");
        let request = self.client.request(Method::DELETE, &path).await;
        let envelope: PlaylistEnvelope = self.client.send(request).await?;
        Ok(envelope.playlist)
    }

    /// Rewrite the song order; ids not in the playlist are ignored
    pub async fn reorder(&self, id: &PlaylistId, song_ids: &[SongId]) -> Result<Playlist> {
        let path = format!("/playlists/{id}/reorder");
        let request = self.client.request(Method::PUT, &path).await;
        let envelope: PlaylistEnvelope = self
            .client
            .send(request.json(&json!({ "songIds": song_ids })))
            .await?;
        Ok(envelope.playlist)
    }

    /// Follow or unfollow; returns whether the playlist is now followed
    pub async fn toggle_follow(&self, id: &PlaylistId) -> Result<bool> {
        let path = format!("/playlists/{id}/follow");
        let request = self.client.request(Method::POST, &path).await;
        let status: FollowingStatus = self.client.send(request).await?;
        Ok(status.is_following)
    }

    pub async fn delete(&self, id: &PlaylistId) -> Result<()> {
        let path = format!("/playlists/{id}");
        let request = self.client.request(Method::DELETE, &path).await;
        self.client.send_empty(request).await
    }
}
