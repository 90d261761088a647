/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Set it as the `authToken` cookie and return the user info
 *
 * # Security
 *
 * - Unknown email and wrong password both return 401 (no user enumeration)
 * - The cookie is HttpOnly, so page scripts cannot read the token
 */
use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Json},
};

use crate::backend::auth::cookies::session_cookie;
use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::sessions::UserIdentity;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::ChatError;

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `500 Internal Server Error` - If hashing or token generation fails
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, BackendError> {
    tracing::info!("[Auth] Login request for: {}", request.email);

    let user = state
        .users
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or_else(|| {
            tracing::warn!("[Auth] Invalid credentials for: {}", request.email);
            ChatError::unauthenticated("invalid email or password")
        })?;

    let identity = UserIdentity {
        user_id: user.id,
        display_name: user.display_name.clone(),
    };
    let token = state.tokens.create_token(&identity)?;
    let cookie = session_cookie(&token, state.config.cookie_max_age_secs);

    tracing::info!("[Auth] User {} logged in", user.id);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            user_id: user.id,
            display_name: user.display_name,
        }),
    ))
}
