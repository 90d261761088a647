/**
 * Registration Handler
 *
 * This module implements the user registration handler for POST /auth/register.
 *
 * # Registration Process
 *
 * 1. Validate email and password length
 * 2. Hash the password with bcrypt (blocking pool)
 * 3. Store the user
 *
 * Registration does not log the user in; clients call `/auth/login` next.
 */
use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::{RegisterRequest, RegisterResponse};
use crate::backend::auth::users::UserStore;
use crate::backend::error::BackendError;

/// Register handler
///
/// # Returns
///
/// `201 Created` with the new user id
///
/// # Errors
///
/// * `400 Bad Request` - Invalid email or password shorter than 6 characters
/// * `409 Conflict` - Email already registered
pub async fn register(
    State(users): State<UserStore>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), BackendError> {
    tracing::info!("[Auth] Registration request for: {}", request.email);

    let user = users
        .create_user(&request.email, &request.password, request.display_name.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            message: "User registered successfully".to_string(),
        }),
    ))
}
