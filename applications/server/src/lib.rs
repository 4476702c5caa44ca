//! PureStream Server Library
//!
//! Music sharing API: accounts, song uploads, playlists, favorites and
//! social features over a SQLite database and a local object store.
//!
//! This library exposes the router and its components so integration tests
//! can drive the API without binding a socket.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{ServerConfig, UploadSettings};
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, file_storage::FileStorage};
pub use state::AppState;

use axum::{
    http::{header::HeaderName, HeaderValue, StatusCode},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
///
/// Every API route lives under `/api`; stored uploads are served from
/// `/uploads`.
pub fn create_router(app_state: AppState) -> Router {
    let auth_service = Arc::clone(&app_state.auth_service);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/stats", get(api::stats::get_stats))
        // Auth
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        // Songs
        .route("/songs", get(api::songs::list_songs))
        .route("/songs/search", get(api::songs::search_songs))
        .route("/songs/popular", get(api::songs::popular_songs))
        .route("/songs/genres", get(api::songs::genres))
        .route("/songs/:id", get(api::songs::get_song))
        .route("/songs/:id/play", post(api::songs::record_play))
        // Playlists
        .route("/playlists/public", get(api::playlists::public_playlists))
        // Users
        .route("/users/search", get(api::users::search_users))
        .route("/users/:id", get(api::users::get_user))
        .route("/users/:id/following", get(api::users::following))
        .route("/users/:id/followers", get(api::users::followers))
        .route("/users/:id/playlists", get(api::users::user_playlists))
        .route("/users/:id/songs", get(api::users::user_songs));

    // Routes that behave differently for signed-in callers
    let optional_routes = Router::new()
        .route("/playlists/:id", get(api::playlists::get_playlist))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::optional_auth_middleware,
        ));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Auth
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        .route("/auth/profile", put(api::auth::update_profile))
        // Songs
        .route("/songs", post(api::songs::upload_song))
        .route("/songs/upload", post(api::songs::upload_song))
        .route("/songs/:id/like", post(api::songs::toggle_like))
        // Playlists
        .route("/playlists", post(api::playlists::create_playlist))
        .route("/playlists/my", get(api::playlists::my_playlists))
        .route(
            "/playlists/:id",
            put(api::playlists::update_playlist).delete(api::playlists::delete_playlist),
        )
        .route("/playlists/:id/songs", post(api::playlists::add_song))
        .route(
            "/playlists/:id/songs/:song_id",
            axum::routing::delete(api::playlists::remove_song),
        )
        .route("/playlists/:id/reorder", put(api::playlists::reorder))
        .route("/playlists/:id/follow", post(api::playlists::toggle_follow))
        // Favorites
        .route("/favorites/songs", get(api::favorites::list_songs))
        .route("/favorites/playlists", get(api::favorites::list_playlists))
        .route(
            "/favorites/songs/:id",
            post(api::favorites::toggle_song)
                .put(api::favorites::add_song)
                .delete(api::favorites::remove_song),
        )
        .route("/favorites/songs/:id/check", get(api::favorites::check_song))
        .route("/favorites/playlists/:id", post(api::favorites::toggle_playlist))
        .route(
            "/favorites/playlists/:id/check",
            get(api::favorites::check_playlist),
        )
        // Users
        .route("/users/recommendations", get(api::users::recommendations))
        .route("/users/:id/follow", post(api::users::toggle_follow))
        .layer(axum_middleware::from_fn_with_state(
            auth_service,
            middleware::auth_middleware,
        ));

    // Uploaded media, readable from any origin
    let uploads = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("cross-origin"),
        ))
        .service(ServeDir::new(app_state.file_storage.base_path()));

    Router::new()
        .nest(
            "/api",
            public_routes.merge(optional_routes).merge(protected_routes),
        )
        .nest_service("/uploads", uploads)
        .fallback(route_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}
