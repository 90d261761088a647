/**
 * Game Request and Response Types
 *
 * Bodies of the `/games` endpoints. Request fields are optional at the
 * serde level so missing fields become a 400 with a clear message instead of
 * a generic body rejection.
 */

use crate::shared::RoomId;
use serde::{Deserialize, Serialize};

/// `POST /games`
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub game_parameters: Option<GameParameters>,
}

/// Settings of a new game
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct GameParameters {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub game_id: RoomId,
}

/// `POST /games/join`
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameRequest {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub game_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GameJoinedResponse {
    pub status: String,
    pub game_id: RoomId,
    /// Live connections of the caller now in the game
    pub connections: usize,
}
