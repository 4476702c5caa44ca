//! User profiles, following and recommendations.

use crate::client::PureStreamClient;
use crate::error::Result;
use crate::types::{
    FollowersEnvelope, FollowingEnvelope, FollowingStatus, PlaylistsEnvelope, Recommendations,
    SongsEnvelope, UserEnvelope, UserPage,
};
use purestream_core::{Playlist, Song, User, UserId};
use reqwest::Method;

/// User endpoints of a [`PureStreamClient`].
pub struct UsersClient<'a> {
    client: &'a PureStreamClient,
}

impl<'a> UsersClient<'a> {
    pub(crate) fn new(client: &'a PureStreamClient) -> Self {
        Self { client }
    }

    /// Songs, playlists and people picked for the logged-in user
    pub async fn recommendations(&self, limit: u32) -> Result<Recommendations> {
        let request = self
            .client
            .request(Method::GET, "/users/recommendations")
            .await;
        self.client.send(request.query(&[("limit", limit)])).await
    }

    /// Search usernames and bios
    pub async fn search(&self, q: &str, page: u32, limit: u32) -> Result<UserPage> {
        let request = self.client.request(Method::GET, "/users/search").await;
        let page = page.to_string();
        let limit = limit.to_string();
        self.client
            .send(request.query(&[("q", q), ("page", page.as_str()), ("limit", limit.as_str())]))
            .await
    }

    pub async fn profile(&self, id: &UserId) -> Result<User> {
        let path = format!("/users/{id}");
        let request = self.client.request(Method::GET, &path).await;
        let envelope: UserEnvelope = self.client.send(request).await?;
        Ok(envelope.user)
    }

    /// Returns whether the user is now followed
    pub async fn toggle_follow(&self, id: &UserId) -> Result<bool> {
        let path = format!("/users/{id}/follow");
        let request = self.client.request(Method::POST, &path).await;
        let status: FollowingStatus = self.client.send(request).await?;
        Ok(status.is_following)
    }

    pub async fn following(&self, id: &UserId) -> Result<Vec<User>> {
        let path = format!("/users/{id}/following");
        let request = self.client.request(Method::GET, &path).await;
        let envelope: FollowingEnvelope = self.client.send(request).await?;
        Ok(envelope.following)
    }

    pub async fn followers(&self, id: &UserId) -> Result<Vec<User>> {
        let path = format!("/users/{id}/followers");
        let request = self.client.request(Method::GET, &path).await;
        let envelope: FollowersEnvelope = self.client.send(request).await?;
        Ok(envelope.followers)
    }

    /// Public playlists owned by the user
    pub async fn playlists_of(&self, id: &UserId) -> Result<Vec<Playlist>> {
        let path = format!("/users/{id}/playlists");
        let request = self.client.request(Method::GET, &path).await;
        let envelope: PlaylistsEnvelope = self.client.send(request).await?;
        Ok(envelope.playlists)
    }

    /// Public songs uploaded by the user
    pub async fn songs_of(&self, id: &UserId) -> Result<Vec<Song>> {
        let path = format!("/users/{id}/songs");
        let request = self.client.request(Method::GET, &path).await;
        let envelope: SongsEnvelope = self.client.send(request).await?;
        Ok(envelope.songs)
    }
}
