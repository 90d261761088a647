/**
 * Session Handlers
 *
 * - `GET /auth/me` - current user (protected)
 * - `GET /auth/websocket-token` - token for the socket handshake (protected)
 * - `POST /auth/logout` - clear the session cookie
 */
use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::backend::auth::cookies::clear_cookie;
use crate::backend::auth::handlers::types::{MeResponse, WebSocketTokenResponse};
use crate::backend::auth::sessions::TokenKeys;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;

/// Get current user handler
pub async fn get_me(AuthUser(identity): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: identity.user_id,
        display_name: identity.display_name,
        authenticated: true,
    })
}

/// Issue a fresh token for the `?token=` socket handshake
///
/// Browsers that cannot rely on the cookie reaching the socket endpoint
/// fetch this first.
pub async fn websocket_token(
    State(tokens): State<TokenKeys>,
    AuthUser(identity): AuthUser,
) -> Result<Json<WebSocketTokenResponse>, BackendError> {
    let token = tokens.create_token(&identity)?;
    Ok(Json(WebSocketTokenResponse { token }))
}

/// Logout handler
///
/// Tokens are stateless, so logging out only removes the cookie.
pub async fn logout() -> impl IntoResponse {
    ([(SET_COOKIE, clear_cookie())], Json(json!({ "message": "Logged out" })))
}
