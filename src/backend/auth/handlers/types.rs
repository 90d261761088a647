/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by authentication handlers.
 * All bodies use camelCase field names.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Login email (case-insensitive)
    pub email: String,
    /// Plain-text password, hashed before storage
    pub password: String,
    /// Name shown in rooms; defaults to the email's local part
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Registration response
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub message: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response; the token itself travels in the `authToken` cookie
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub display_name: String,
}

/// Current user
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: Uuid,
    pub display_name: String,
    pub authenticated: bool,
}

/// Token for the `?token=` socket handshake
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WebSocketTokenResponse {
    pub token: String,
}
