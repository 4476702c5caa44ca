/// Shared application state
use crate::config::UploadSettings;
use crate::services::{AuthService, FileStorage};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub file_storage: Arc<FileStorage>,
    pub limits: UploadSettings,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        file_storage: Arc<FileStorage>,
        limits: UploadSettings,
    ) -> Self {
        Self {
            pool,
            auth_service,
            file_storage,
            limits,
        }
    }
}
