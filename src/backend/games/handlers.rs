/**
 * Game Handlers
 *
 * REST surface of the room directory. These handlers operate on the same
 * `ChatHub` as the socket sessions:
 *
 * - `GET /games` - list rooms in creation order (public)
 * - `POST /games` - create a room (authenticated)
 * - `POST /games/join` - select a room for the caller and move their live
 *   connections into it (authenticated)
 */

use axum::{extract::State, http::StatusCode, response::Json};
use uuid::Uuid;

use crate::backend::auth::sessions::UserIdentity;
use crate::backend::chat::{ChatHub, RoomSummary};
use crate::backend::error::BackendError;
use crate::backend::games::types::{
    CreateGameRequest, CreateGameResponse, GameJoinedResponse, JoinGameRequest,
};
use crate::backend::middleware::AuthUser;

/// List games handler
pub async fn list_games(State(hub): State<ChatHub>) -> Json<Vec<RoomSummary>> {
    Json(hub.list_rooms().await)
}

/// Create game handler
///
/// # Errors
///
/// * `400 Bad Request` - Missing `playerId` or an empty room name
/// * `403 Forbidden` - `playerId` is not the caller
pub async fn create_game(
    State(hub): State<ChatHub>,
    AuthUser(identity): AuthUser,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, BackendError> {
    let player_id = check_player(request.player_id.as_deref(), &identity)?;
    let name = request
        .game_parameters
        .as_ref()
        .and_then(|parameters| parameters.name.as_deref());

    let room = hub.create_room(name, player_id).await?;
    tracing::info!("[Games] {} created game {} ('{}')", player_id, room.id, room.name);
    Ok(Json(CreateGameResponse { game_id: room.id }))
}

/// Join game handler
///
/// # Errors
///
/// * `400 Bad Request` - Missing `playerId` or `gameId`
/// * `403 Forbidden` - `playerId` is not the caller
/// * `404 Not Found` - Unknown game
pub async fn join_game(
    State(hub): State<ChatHub>,
    AuthUser(identity): AuthUser,
    Json(request): Json<JoinGameRequest>,
) -> Result<Json<GameJoinedResponse>, BackendError> {
    let player_id = check_player(request.player_id.as_deref(), &identity)?;
    let game_id = request
        .game_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| BackendError::bad_request("gameId is required"))?;

    let (room, connections) = hub.select_room(player_id, game_id).await?;
    Ok(Json(GameJoinedResponse {
        status: "joined".to_string(),
        game_id: room.id,
        connections,
    }))
}

/// The body's `playerId` must name the authenticated caller
fn check_player(player_id: Option<&str>, identity: &UserIdentity) -> Result<Uuid, BackendError> {
    let raw = player_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| BackendError::bad_request("playerId is required"))?;
    let player_id = Uuid::parse_str(raw)
        .map_err(|_| BackendError::bad_request("playerId must be a UUID"))?;
    if player_id != identity.user_id {
        tracing::warn!(
            "[Games] Caller {} tried to act as player {}",
            identity.user_id,
            player_id
        );
        return Err(BackendError::handler(
            StatusCode::FORBIDDEN,
            "playerId does not match the authenticated user",
        ));
    }
    Ok(player_id)
}
