/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server:
 * state creation and route configuration.
 *
 * # Initialization Process
 *
 * 1. Create the application state (hub, token keys, user store)
 * 2. Create and configure the router
 *
 * All chat state is in memory; a restart starts with no rooms and no users.
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `config` - Validated server configuration
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_app(config: ServerConfig) -> Router<()> {
    create_app_with_state(AppState::new(config))
}

/// Build the router around existing state
///
/// Tests use this to keep a handle on the hub while serving requests.
pub fn create_app_with_state(app_state: AppState) -> Router<()> {
    tracing::info!("[Server] Initializing gamechat backend");

    // Step 1: Report what the state was built with
    tracing::info!(
        "[Server] History {} messages per room, outbound queue {} frames",
        app_state.config.message_history,
        app_state.config.outbound_queue
    );

    // Step 2: Create router with all routes
    let app = create_router(app_state);
    tracing::info!("[Server] Router configured");
    app
}
