/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use purestream_core::{NewUser, UpdateProfile, User};
use purestream_storage::users;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let username = req.username.trim();
    let email = req.email.trim().to_lowercase();

    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ServerError::BadRequest(
            "Username, email and password are required".to_string(),
        ));
    }

    if users::email_or_username_taken(&app_state.pool, &email, username).await? {
        return Err(ServerError::BadRequest(
            "A user with this email or username already exists".to_string(),
        ));
    }

    let password_hash = app_state.auth_service.hash_password(&req.password)?;
    let user = users::create(
        &app_state.pool,
        NewUser {
            username: username.to_string(),
            email,
            password_hash,
        },
    )
    .await?;

    let token = app_state.auth_service.create_token(&user.id)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let invalid = || ServerError::Auth("Invalid email or password".to_string());

    let credentials = users::get_credentials_by_email(&app_state.pool, &req.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &credentials.password_hash)?
    {
        return Err(invalid());
    }

    let mut user = credentials.user;
    users::set_online(&app_state.pool, &user.id, true).await?;
    user.is_online = true;

    let token = app_state.auth_service.create_token(&user.id)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MessageResponse>> {
    users::set_online(&app_state.pool, auth.user_id(), false).await?;

    Ok(Json(MessageResponse {
        message: "Logout successful".to_string(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<UserResponse>> {
    let user = users::get_by_id(&app_state.pool, auth.user_id())
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        message: None,
        user,
    }))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(mut update): Json<UpdateProfile>,
) -> Result<Json<UserResponse>> {
    if let Some(username) = update.username.as_deref().map(str::trim) {
        if username.is_empty() {
            return Err(ServerError::BadRequest("Username cannot be empty".to_string()));
        }
        if users::username_taken(&app_state.pool, username, auth.user_id()).await? {
            return Err(ServerError::BadRequest("Username is already taken".to_string()));
        }
        update.username = Some(username.to_string());
    }

    let user = users::update_profile(&app_state.pool, auth.user_id(), update).await?;

    Ok(Json(UserResponse {
        message: Some("Profile updated successfully".to_string()),
        user,
    }))
}
