/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_uploads")]
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Root of the object store; files live in `songs/` and `covers/` below it
    #[serde(default = "default_uploads_path")]
    pub uploads_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_token_expiration_days")]
    pub token_expiration_days: u64,
}

/// Size ceilings for multipart uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadSettings {
    #[serde(default = "default_max_audio_bytes")]
    pub max_audio_bytes: u64,

    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from `path` (if present) and environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        // Override with environment variables, e.g. PURESTREAM_AUTH__JWT_SECRET
        settings = settings.add_source(
            config::Environment::with_prefix("PURESTREAM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set PURESTREAM_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.uploads.max_audio_bytes == 0 || self.uploads.max_image_bytes == 0 {
            return Err(ServerError::Config(
                "Upload size limits must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        uploads_path: default_uploads_path(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/purestream.db".to_string()
}

fn default_uploads_path() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        token_expiration_days: default_token_expiration_days(),
    }
}

fn default_token_expiration_days() -> u64 {
    7
}

fn default_uploads() -> UploadSettings {
    UploadSettings::default()
}

fn default_max_audio_bytes() -> u64 {
    50 * MIB
}

fn default_max_image_bytes() -> u64 {
    5 * MIB
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_audio_bytes: default_max_audio_bytes(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            uploads: default_uploads(),
        }
    }
}
