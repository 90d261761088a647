/**
 * Shared Error Types
 *
 * This module defines the error taxonomy of the chat core. The same type is
 * used by the connection layer (where errors become error acknowledgment
 * frames) and by the REST layer (where they become HTTP responses).
 *
 * # Error Types
 *
 * - `Unauthenticated` - missing, malformed, expired or forged credential
 * - `RoomNotFound` - join referencing an unknown room id
 * - `InvalidRoomName` - empty or whitespace room name on create
 * - `NotInRoom` - chat action before joining a room
 * - `MalformedFrame` - unparseable inbound payload; closes the connection
 * - `DuplicateConnection` - a connection id registered twice
 * - `ConnectionNotFound` - operation on a connection that is gone
 * - `InvalidScreenName` / `InvalidMessage` - input validation
 *
 * Delivery failures are not errors at this level: the broadcast path records
 * them in its report and cleans up the failed recipient.
 */
use crate::shared::ids::ConnectionId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire code carried by `{type:"error"}` acknowledgment frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    Unauthenticated,
    RoomNotFound,
    InvalidRoomName,
    NotInRoom,
    MalformedFrame,
    DuplicateConnection,
    ConnectionNotFound,
    InvalidScreenName,
    InvalidMessage,
}

/// Errors raised by the chat core
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    /// The presented credential could not be verified
    #[error("Unauthenticated: {reason}")]
    Unauthenticated {
        /// Why verification failed (never echoes the credential)
        reason: String,
    },

    /// The referenced room does not exist
    #[error("Room not found: {room}")]
    RoomNotFound {
        /// The id as the caller supplied it
        room: String,
    },

    /// Room names must contain at least one non-whitespace character
    #[error("Invalid room name: {reason}")]
    InvalidRoomName { reason: String },

    /// The action requires the connection to be in a room
    #[error("Not in a room")]
    NotInRoom,

    /// The inbound payload could not be parsed
    #[error("Malformed frame: {message}")]
    MalformedFrame { message: String },

    #[error("Duplicate connection: {0}")]
    DuplicateConnection(ConnectionId),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(ConnectionId),

    #[error("Screen name cannot be empty")]
    InvalidScreenName,

    #[error("Invalid message: {message}")]
    InvalidMessage { message: String },
}

impl ChatError {
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated {
            reason: reason.into(),
        }
    }

    pub fn room_not_found(room: impl ToString) -> Self {
        Self::RoomNotFound {
            room: room.to_string(),
        }
    }

    pub fn invalid_room_name(reason: impl Into<String>) -> Self {
        Self::InvalidRoomName {
            reason: reason.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedFrame {
            message: message.into(),
        }
    }

    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
        }
    }

    /// Wire code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthenticated { .. } => ErrorCode::Unauthenticated,
            Self::RoomNotFound { .. } => ErrorCode::RoomNotFound,
            Self::InvalidRoomName { .. } => ErrorCode::InvalidRoomName,
            Self::NotInRoom => ErrorCode::NotInRoom,
            Self::MalformedFrame { .. } => ErrorCode::MalformedFrame,
            Self::DuplicateConnection(_) => ErrorCode::DuplicateConnection,
            Self::ConnectionNotFound(_) => ErrorCode::ConnectionNotFound,
            Self::InvalidScreenName => ErrorCode::InvalidScreenName,
            Self::InvalidMessage { .. } => ErrorCode::InvalidMessage,
        }
    }

    /// Whether the connection that caused this error must be closed
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MalformedFrame { .. } | Self::Unauthenticated { .. })
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}
