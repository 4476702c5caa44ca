/// Authentication middleware
use crate::{error::ServerError, services::AuthService};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use purestream_core::UserId;
use std::sync::Arc;

/// Identity of the caller, attached by [`auth_middleware`]
///
/// Can be used as an extractor in handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

/// Identity of the caller when a valid token was presented
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<UserId>);

impl MaybeUser {
    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that rejects requests without a valid bearer token
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return ServerError::Auth("Access token required".to_string()).into_response();
    };

    let user_id = match auth_service.verify_token(token) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!("Token verification failed: {}", e);
            return ServerError::Auth("Invalid token".to_string()).into_response();
        }
    };

    request.extensions_mut().insert(AuthenticatedUser(user_id));
    next.run(request).await
}

/// Middleware that attaches the caller's identity when the token is valid
///
/// Missing or invalid tokens pass through anonymously.
pub async fn optional_auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = bearer_token(request.headers())
        .and_then(|token| auth_service.verify_token(token).ok());

    request.extensions_mut().insert(MaybeUser(user_id));
    next.run(request).await
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<MaybeUser>()
            .cloned()
            .unwrap_or_default())
    }
}
