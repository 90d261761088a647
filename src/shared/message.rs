/**
 * Chat Message
 *
 * A message accepted into a room. Messages are transient: they are fanned
 * out to the room's members and kept in the room's bounded history buffer so
 * late joiners can replay recent traffic with `getMessages`.
 */
use crate::shared::event::VisibleMessage;
use crate::shared::ids::RoomId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single chat message
///
/// # Fields
/// * `sender_name` - Screen name of the sender at the time the message was sent
/// * `body` - The message text
/// * `room_id` - Room the message was posted to
/// * `sent_at` - When the server accepted the message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender_name: String,
    pub body: String,
    pub room_id: RoomId,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message stamped with the current time
    pub fn new(room_id: RoomId, sender_name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender_name: sender_name.into(),
            body: body.into(),
            room_id,
            sent_at: Utc::now(),
        }
    }

    /// The client-facing projection used by `getMessagesResponse`
    pub fn visible(&self) -> VisibleMessage {
        VisibleMessage {
            screen_name: self.sender_name.clone(),
            message: self.body.clone(),
        }
    }
}
