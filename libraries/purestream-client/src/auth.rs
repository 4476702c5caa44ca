//! Authentication endpoints.

use crate::client::PureStreamClient;
use crate::error::Result;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, UserEnvelope};
use purestream_core::{UpdateProfile, User};
use reqwest::Method;
use tracing::info;

/// Authentication endpoints of a [`PureStreamClient`].
pub struct AuthClient<'a> {
    client: &'a PureStreamClient,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(client: &'a PureStreamClient) -> Self {
        Self { client }
    }

    /// Create an account; the returned token is stored for later requests.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let body = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.client.request(Method::POST, "/auth/register").await;
        let response: AuthResponse = self.client.send(request.json(&body)).await?;

        self.client.set_token(response.token.clone()).await;
        info!(user_id = %response.user.id, "Registered");
        Ok(response)
    }

    /// Login with email and password.
    ///
    /// On success the token is stored for subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.client.request(Method::POST, "/auth/login").await;
        let response: AuthResponse = self.client.send(request.json(&body)).await?;

        self.client.set_token(response.token.clone()).await;
        info!(user_id = %response.user.id, username = %response.user.username, "Login successful");
        Ok(response)
    }

    /// Mark the session offline and forget the token.
    ///
    /// The token is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<()> {
        let request = self.client.request(Method::POST, "/auth/logout").await;
        let result = self.client.send_empty(request).await;
        self.client.clear_token().await;
        result
    }

    /// The logged-in user
    pub async fn me(&self) -> Result<User> {
        let request = self.client.request(Method::GET, "/auth/me").await;
        let envelope: UserEnvelope = self.client.send(request).await?;
        Ok(envelope.user)
    }

    pub async fn update_profile(&self, update: &UpdateProfile) -> Result<User> {
        let request = self.client.request(Method::PUT, "/auth/profile").await;
        let envelope: UserEnvelope = self.client.send(request.json(update)).await?;
        Ok(envelope.user)
    }
}
