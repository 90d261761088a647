/**
 * Socket Frames
 *
 * This module defines the JSON frames exchanged over the chat socket. Every
 * frame is an object with a `type` discriminator and a flat payload:
 *
 * ```json
 * {"type": "sendMessage", "message": "hello"}
 * {"type": "messageReceivedNotification", "screenName": "alice", "message": "hello"}
 * ```
 *
 * Unknown inbound `type` values parse to [`ClientFrame::Unknown`] so newer
 * clients can talk to older servers; anything that is not a JSON object with
 * a string `type`, or a known type with a broken payload, is malformed.
 */
use crate::shared::error::{ChatError, ErrorCode};
use crate::shared::ids::RoomId;
use serde::{Deserialize, Serialize};

/// Frame sent by a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientFrame {
    /// Replay the current room's message buffer
    GetMessages,
    /// Post a chat message to the current room
    SendMessage { message: String },
    /// List the screen names in the current room
    GetPlayers,
    /// Change the name shown next to this connection's messages
    SetScreenName { screen_name: String },
    /// Join (or switch to) a room
    JoinGame { game_id: String },
    /// Leave the current room, if any
    LeaveGame,
    /// Any `type` this server does not know
    #[serde(other)]
    Unknown,
}

impl ClientFrame {
    /// Parse one inbound text frame
    ///
    /// # Errors
    ///
    /// `ChatError::MalformedFrame` when the text is not a frame at all.
    pub fn parse(text: &str) -> Result<Self, ChatError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One buffered message as replayed by `getMessagesResponse`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VisibleMessage {
    pub screen_name: String,
    pub message: String,
}

/// Frame sent by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    GetMessagesResponse {
        messages: Vec<VisibleMessage>,
    },
    MessageReceivedNotification {
        screen_name: String,
        message: String,
    },
    PlayerJoinedChatNotification {
        screen_name: String,
    },
    PlayerLeftChatNotification {
        screen_name: String,
    },
    GetPlayersResponse {
        screen_names: Vec<String>,
    },
    JoinGameResponse {
        game_id: RoomId,
        name: String,
    },
    /// Error acknowledgment; the connection stays open unless the error is fatal
    Error {
        code: ErrorCode,
        message: String,
    },
    /// Event from a newer server
    #[serde(other)]
    Unknown,
}

impl ServerEvent {
    /// Build the error acknowledgment for a chat error
    pub fn error(err: &ChatError) -> Self {
        Self::Error {
            code: err.code(),
            message: err.to_string(),
        }
    }

    /// Wire name of this event, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GetMessagesResponse { .. } => "getMessagesResponse",
            Self::MessageReceivedNotification { .. } => "messageReceivedNotification",
            Self::PlayerJoinedChatNotification { .. } => "playerJoinedChatNotification",
            Self::PlayerLeftChatNotification { .. } => "playerLeftChatNotification",
            Self::GetPlayersResponse { .. } => "getPlayersResponse",
            Self::JoinGameResponse { .. } => "joinGameResponse",
            Self::Error { .. } => "error",
            Self::Unknown => "unknown",
        }
    }
}
