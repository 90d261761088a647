//! Authentication test helpers
//!
//! Provides utilities for creating test users and tokens without going
//! through the HTTP endpoints.

use gamechat::backend::auth::UserIdentity;
use gamechat::backend::server::AppState;
use uuid::Uuid;

/// Test user credentials
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub token: String,
}

pub const TEST_PASSWORD: &str = "test_password_123";

/// Register a user in the store and sign a token for them
pub async fn create_test_user(state: &AppState, display_name: &str) -> TestUser {
    let email = format!("{}_{}@example.com", display_name.to_lowercase(), Uuid::new_v4());
    let user = state
        .users
        .create_user(&email, TEST_PASSWORD, Some(display_name))
        .await
        .expect("Failed to create test user");

    let token = state
        .tokens
        .create_token(&UserIdentity {
            user_id: user.id,
            display_name: user.display_name.clone(),
        })
        .expect("Failed to sign test token");

    TestUser {
        id: user.id,
        email: user.email,
        password: TEST_PASSWORD.to_string(),
        display_name: user.display_name,
        token,
    }
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
