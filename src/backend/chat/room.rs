/**
 * Rooms
 *
 * A room ("game" in the REST vocabulary) scopes membership and message
 * fan-out. Members are stored as connection ids only; the connection objects
 * stay owned by the registry.
 *
 * Each room carries two locks:
 *
 * - `state` guards the member set and the message history. Membership changes
 *   and history appends happen under it.
 * - `delivery` serialises fan-outs for this room, giving the room a total
 *   order over everything it delivers. It is always taken before `state`.
 */

use crate::shared::{ChatMessage, ConnectionId, RoomId, VisibleMessage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Bounded buffer of the most recent messages in a room
#[derive(Debug, Clone)]
pub struct MessageHistory {
    capacity: usize,
    messages: VecDeque<ChatMessage>,
}

impl MessageHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// Append a message, dropping the oldest when full
    pub fn push(&mut self, message: ChatMessage) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Messages in the order they were accepted, oldest first
    pub fn visible(&self) -> Vec<VisibleMessage> {
        self.messages.iter().map(ChatMessage::visible).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Mutable part of a room
#[derive(Debug)]
pub struct RoomState {
    pub members: HashSet<ConnectionId>,
    pub history: MessageHistory,
}

/// A chat room
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    state: Mutex<RoomState>,
    delivery: Mutex<()>,
}

impl Room {
    pub fn new(name: String, created_by: Uuid, history_capacity: usize) -> Self {
        Self {
            id: RoomId::new(),
            name,
            created_by,
            created_at: Utc::now(),
            state: Mutex::new(RoomState {
                members: HashSet::new(),
                history: MessageHistory::new(history_capacity),
            }),
            delivery: Mutex::new(()),
        }
    }

    pub(crate) async fn lock_state(&self) -> MutexGuard<'_, RoomState> {
        self.state.lock().await
    }

    pub(crate) async fn lock_delivery(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().await
    }

    pub async fn member_count(&self) -> usize {
        self.state.lock().await.members.len()
    }

    pub async fn is_member(&self, id: ConnectionId) -> bool {
        self.state.lock().await.members.contains(&id)
    }

    /// Buffered messages for `getMessages` replay
    pub async fn history(&self) -> Vec<VisibleMessage> {
        self.state.lock().await.history.visible()
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            game_id: self.id,
            name: self.name.clone(),
            creator_id: self.created_by,
            created_at: self.created_at,
        }
    }
}

/// Listing entry returned by `GET /games`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub game_id: RoomId,
    pub name: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}
