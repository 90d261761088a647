/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The validated server configuration
 * - The chat hub (connection registry and room directory)
 * - Token keys used to issue and verify credentials
 * - The user store backing the auth endpoints
 *
 * Every field is cheap to clone; the hub and user store share their
 * contents through `Arc`.
 *
 * # Example
 *
 * ```rust,no_run
 * use gamechat::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let stats = state.hub.stats().await;
 *     tracing::info!("{} rooms", stats.rooms);
 * }
 * ```
 */

use crate::backend::auth::sessions::TokenKeys;
use crate::backend::auth::users::UserStore;
use crate::backend::chat::ChatHub;
use crate::backend::server::config::ServerConfig;
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared by every handler
#[derive(Clone, Debug)]
pub struct AppState {
    /// Validated configuration
    pub config: Arc<ServerConfig>,

    /// Live connections and rooms
    ///
    /// REST handlers and socket sessions share this instance, so a room
    /// created over REST is visible to connections immediately.
    pub hub: ChatHub,

    /// JWT signing and verification keys
    pub tokens: TokenKeys,

    /// Registered users
    pub users: UserStore,
}

impl AppState {
    /// Build fresh state from a configuration
    pub fn new(config: ServerConfig) -> Self {
        Self {
            hub: ChatHub::from_config(&config),
            tokens: TokenKeys::new(&config.jwt_secret, config.token_ttl_secs),
            users: UserStore::new(config.bcrypt_cost),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for ChatHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for UserStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}
