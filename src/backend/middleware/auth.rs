/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It finds the session token in the `Authorization:
 * Bearer` header or the `authToken` cookie, verifies it, and hands the
 * resulting identity to handlers.
 */

use crate::backend::auth::cookies::cookie_token;
use crate::backend::auth::sessions::UserIdentity;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Token presented with a request, header first, then cookie
pub fn request_credential(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());
    bearer.or_else(|| cookie_token(headers))
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the token from the Authorization header or the cookie
/// 2. Verifies signature and expiry
/// 3. Attaches the `UserIdentity` to request extensions for handlers
///
/// Returns 401 Unauthorized if the token is missing or invalid
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let credential = request_credential(request.headers());
    let identity = app_state.tokens.verify(credential.as_deref()).map_err(|err| {
        tracing::warn!("[Auth] Rejected request to {}: {}", request.uri().path(), err);
        err
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthUser(pub UserIdentity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserIdentity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("[Auth] UserIdentity not found in request extensions");
                crate::shared::ChatError::unauthenticated("missing credential").into()
            })
    }
}
