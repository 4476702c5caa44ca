/// Common test utilities and fixtures
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use purestream_server::{
    config::UploadSettings,
    create_router,
    services::{AuthService, FileStorage},
    state::AppState,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Test user credentials
pub mod fixtures {
    pub const TEST_USERNAME: &str = "testuser";
    pub const TEST_EMAIL: &str = "test@example.com";
    pub const TEST_PASSWORD: &str = "TestPassword123!";
}

/// A router over a fresh database and upload directory
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub file_storage: Arc<FileStorage>,
    // Keeps the database and uploads alive for the test's duration
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_limits(UploadSettings::default()).await
    }

    pub async fn with_limits(limits: UploadSettings) -> Self {
        let temp_dir = TempDir::new().unwrap();

        let url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let pool = purestream_storage::create_pool(&url).await.unwrap();
        purestream_storage::run_migrations(&pool).await.unwrap();

        let file_storage = FileStorage::new(temp_dir.path().join("uploads"));
        file_storage.initialize().await.unwrap();
        let file_storage = Arc::new(file_storage);

        let auth_service =
            Arc::new(AuthService::new("test-secret-key".to_string(), 7).with_bcrypt_cost(4));

        let app_state = AppState::new(
            pool.clone(),
            Arc::clone(&auth_service),
            Arc::clone(&file_storage),
            limits,
        );

        Self {
            router: create_router(app_state),
            pool,
            auth_service,
            file_storage,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request and return the status with the decoded JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("DELETE", uri, token, None)).await
    }

    /// Register a user through the API; returns `(token, user id)`
    pub async fn register(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": fixtures::TEST_PASSWORD,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Upload a song through the API; returns the song JSON
    pub async fn upload_song(&self, token: &str, title: &str, genre: &str) -> Value {
        let body = multipart_body(
            &[("title", title), ("artist", "Test Artist"), ("genre", genre)],
            Some(("audio", "track.mp3", "audio/mpeg", b"ID3 fake mp3 data")),
        );
        let (status, json) = self.send(multipart_request(token, body)).await;
        assert_eq!(status, StatusCode::CREATED, "upload failed: {json}");
        json["song"].clone()
    }
}

pub const BOUNDARY: &str = "purestream-test-boundary";

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Encode text fields and an optional file part as multipart/form-data
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &str, &[u8])>) -> Vec<u8> {
    multipart_body_with_files(fields, file.as_slice())
}

/// Encode text fields and any number of file parts
pub fn multipart_body_with_files(
    fields: &[(&str, &str)],
    files: &[(&str, &str, &str, &[u8])],
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, content_type, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/songs")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
