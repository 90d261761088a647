/**
 * API Routes
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /auth/register` - User registration
 * - `POST /auth/login` - Login, sets the `authToken` cookie
 * - `POST /auth/logout` - Clears the cookie
 * - `GET /auth/me` - Current user (authenticated)
 * - `GET /auth/websocket-token` - Token for `?token=` (authenticated)
 *
 * ## Games
 * - `GET /games` - List games
 * - `POST /games` - Create a game (authenticated)
 * - `POST /games/join` - Join a game (authenticated)
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{get_me, login, logout, register, websocket_token};
use crate::backend::games::{create_game, join_game, list_games};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Protected routes sit in their own router behind [`auth_middleware`] and
/// are merged into the public ones.
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `app_state` - State handed to the auth middleware
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/websocket-token", get(websocket_token))
        .route("/games", post(create_game))
        .route("/games/join", post(join_game))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware));

    let public = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/games", get(list_games));

    router.merge(public).merge(protected)
}
