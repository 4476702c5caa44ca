//! Favorite songs and followed playlists.

use crate::client::PureStreamClient;
use crate::error::Result;
use crate::types::{FollowedStatus, LikeStatus, PlaylistsEnvelope, SongsEnvelope};
use purestream_core::{Playlist, PlaylistId, Song, SongId};
use reqwest::Method;

/// Favorites endpoints of a [`PureStreamClient`].
pub struct FavoritesClient<'a> {
    client: &'a PureStreamClient,
}

impl<'a> FavoritesClient<'a> {
    pub(crate) fn new(client: &'a PureStreamClient) -> Self {
        Self { client }
    }

    /// Liked songs, most recent first
    pub async fn songs(&self) -> Result<Vec<Song>> {
        let request = self.client.request(Method::GET, "/favorites/songs").await;
        let envelope: SongsEnvelope = self.client.send(request).await?;
        Ok(envelope.songs)
    }

    pub async fn playlists(&self) -> Result<Vec<Playlist>> {
        let request = self.client.request(Method::GET, "/favorites/playlists").await;
        let envelope: PlaylistsEnvelope = self.client.send(request).await?;
        Ok(envelope.playlists)
    }

    /// Returns whether the song is now liked
    pub async fn toggle_song(&self, id: &SongId) -> Result<bool> {
        self.like(Method::POST, id).await
    }

    /// Like a song; liking twice is harmless
    pub async fn add_song(&self, id: &SongId) -> Result<bool> {
        self.like(Method::PUT, id).await
    }

    /// Unlike a song; unliking twice is harmless
    pub async fn remove_song(&self, id: &SongId) -> Result<bool> {
        self.like(Method::DELETE, id).await
    }

    async fn like(&self, method: Method, id: &SongId) -> Result<bool> {
        let path = format!("/favorites/songs/{id}");
        let request = self.client.request(method, &path).await;
        let status: LikeStatus = self.client.send(request).await?;
        Ok(status.is_liked)
    }

    pub async fn check_song(&self, id: &SongId) -> Result<bool> {
        let path = format!("/favorites/songs/{id}/check");
        let request = self.client.request(Method::GET, &path).await;
        let status: LikeStatus = self.client.send(request).await?;
        Ok(status.is_liked)
    }

    /// Returns whether the playlist is now followed
    pub async fn toggle_playlist(&self, id: &PlaylistId) -> Result<bool> {
        let path = format!("/favorites/playlists/{id}");
        let request = self.client.request(Method::POST, &path).await;
        let status: FollowedStatus = self.client.send(request).await?;
        Ok(status.is_followed)
    }

    pub async fn check_playlist(&self, id: &PlaylistId) -> Result<bool> {
        let path = format!("/favorites/playlists/{id}/check");
        let request = self.client.request(Method::GET, &path).await;
        let status: FollowedStatus = self.client.send(request).await?;
        Ok(status.is_followed)
    }
}
