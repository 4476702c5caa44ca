//! Main PureStream client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::favorites::FavoritesClient;
use crate::playlists::PlaylistsClient;
use crate::songs::SongsClient;
use crate::stats::StatsClient;
use crate::types::ClientConfig;
use crate::users::UsersClient;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Client for a PureStream server.
///
/// Cheap to clone; clones share the HTTP connection pool and the stored
/// token. Endpoint groups are reached through borrowed sub-clients.
///
/// # Example
///
/// ```ignore
/// use purestream_client::{ClientConfig, PureStreamClient};
///
/// let client = PureStreamClient::new(ClientConfig::new("https://music.example.com"))?;
/// client.auth().login("ada@example.com", "hunter22").await?;
///
/// let page = client.songs().list(&Default::default()).await?;
/// println!("{} songs", page.pagination.total);
/// ```
#[derive(Clone)]
pub struct PureStreamClient {
    http: Client,
    config: Arc<RwLock<ClientConfig>>,
}

/// `{ "error": "..." }` body of failed requests
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl PureStreamClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("PureStream/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(ClientConfig {
                url,
                token: config.token,
            })),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client holds a token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.token.is_some()
    }

    pub async fn token(&self) -> Option<String> {
        self.config.read().await.token.clone()
    }

    /// Set the token directly (e.g., from stored credentials).
    pub async fn set_token(&self, token: impl Into<String>) {
        self.config.write().await.token = Some(token.into());
    }

    /// Forget the stored token.
    pub async fn clear_token(&self) {
        self.config.write().await.token = None;
        info!("Cleared session token");
    }

    // ===== Endpoint groups =====

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(self)
    }

    pub fn songs(&self) -> SongsClient<'_> {
        SongsClient::new(self)
    }

    pub fn playlists(&self) -> PlaylistsClient<'_> {
        PlaylistsClient::new(self)
    }

    pub fn favorites(&self) -> FavoritesClient<'_> {
        FavoritesClient::new(self)
    }

    pub fn users(&self) -> UsersClient<'_> {
        UsersClient::new(self)
    }

    pub fn stats(&self) -> StatsClient<'_> {
        StatsClient::new(self)
    }

    // ===== Request plumbing =====

    /// Build a request for `/api{path}`, with the bearer token when present
    pub(crate) async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let config = self.config.read().await;
        let url = format!("{}/api{}", config.url, path);
        debug!(%method, url = %url, "Sending request");

        let builder = self.http.request(method, url);
        match &config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode its JSON body
    pub(crate) async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.execute(builder).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    /// Send a request and discard its body
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.execute(builder).await.map(drop)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::AuthRequired);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) if text.is_empty() => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
            Err(_) => text,
        };

        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}
