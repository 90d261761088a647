/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Socket upgrade endpoint (path from config, `/websocket` by default)
 * 2. Health check
 * 3. API routes (auth, games)
 * 4. Fallback handler (404)
 *
 * CORS is only enabled when an origin is configured; credentials are
 * allowed so the `authToken` cookie travels with cross-origin requests.
 */

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::realtime::handle_socket_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::health::health;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing the hub, keys and users
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let websocket_path = app_state.config.websocket_path.clone();

    let router = Router::new()
        .route(&websocket_path, get(handle_socket_upgrade))
        .route("/health", get(health));

    // Add API routes
    let router = configure_api_routes(router, &app_state);

    // Fallback handler for 404
    let router = router.fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") });

    let router = match cors_layer(app_state.config.cors_origin.as_deref()) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(app_state)
}

fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        ),
        Err(err) => {
            tracing::warn!("[Server] Ignoring invalid CORS origin '{}': {}", origin, err);
            None
        }
    }
}
