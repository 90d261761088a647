/**
 * Chat Hub
 *
 * Facade over the connection registry and the room directory. Socket
 * sessions and REST handlers both go through the hub, so a room created or
 * joined over REST is immediately visible to live connections.
 *
 * # Notifications
 *
 * - Joining sends `joinGameResponse` to the joiner, `playerLeftChatNotification`
 *   to the previous room (if any), then `playerJoinedChatNotification` to every
 *   member of the new room including the joiner.
 * - Messages are echoed to the sender: a broadcast makes exactly one delivery
 *   attempt per member.
 * - A connection that fails a delivery is removed as if it had disconnected,
 *   and its room is told it left. Removal is iterative: failures that happen
 *   while announcing one departure are queued, never recursed into.
 */

use crate::backend::chat::directory::{JoinOutcome, LeaveOutcome, RoomDirectory};
use crate::backend::chat::registry::{Connection, ConnectionRegistry, OutboundFrame};
use crate::backend::chat::room::{Room, RoomSummary};
use crate::backend::realtime::broadcast::{encode_event, fan_out, DeliveryFailure, DeliveryReport};
use crate::backend::server::config::ServerConfig;
use crate::shared::{ChatError, ChatMessage, ConnectionId, RoomId, ServerEvent, VisibleMessage};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Counters reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubStats {
    pub connections: usize,
    pub rooms: usize,
}

#[derive(Debug)]
struct HubInner {
    registry: ConnectionRegistry,
    directory: RoomDirectory,
    max_message_len: usize,
}

/// Shared chat state; cheap to clone
#[derive(Debug, Clone)]
pub struct ChatHub {
    inner: Arc<HubInner>,
}

impl ChatHub {
    /// Create an empty hub
    ///
    /// # Arguments
    /// * `history_capacity` - Messages kept per room for replay
    /// * `max_message_len` - Longest accepted message body, in characters
    pub fn new(history_capacity: usize, max_message_len: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                registry: ConnectionRegistry::new(),
                directory: RoomDirectory::new(history_capacity),
                max_message_len,
            }),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.message_history, config.max_message_len)
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.inner.registry
    }

    pub fn directory(&self) -> &RoomDirectory {
        &self.inner.directory
    }

    /// Register a freshly authenticated connection
    ///
    /// If the user already picked a room over REST, the connection joins it
    /// straight away.
    pub async fn connect(&self, connection: Connection) -> Result<Arc<Connection>, ChatError> {
        let user_id = connection.identity.user_id;
        let connection = self.registry().register(connection).await?;
        tracing::info!(
            connection_id = %connection.id,
            user_id = %user_id,
            "[Hub] Connection registered"
        );

        if let Some(room_id) = self.directory().selected_room(user_id).await {
            if let Err(err) = self.join_room_id(connection.id, room_id).await {
                tracing::warn!(connection_id = %connection.id, "[Hub] Auto-join failed: {}", err);
            }
        }
        Ok(connection)
    }

    /// Remove a connection and tell its room it left
    ///
    /// # Returns
    /// `false` when the connection was already gone
    pub async fn disconnect(&self, connection_id: ConnectionId) -> bool {
        self.evict(vec![connection_id]).await > 0
    }

    pub async fn create_room(&self, name: Option<&str>, owner: Uuid) -> Result<Arc<Room>, ChatError> {
        self.directory().create_room(name, owner).await
    }

    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        self.directory().list_rooms().await
    }

    /// Join a room by the id string a client sent, and remember the choice
    pub async fn join_room(&self, connection_id: ConnectionId, raw_game_id: &str) -> Result<JoinOutcome, ChatError> {
        let room = self.directory().find(raw_game_id).await?;
        let outcome = self.join_room_id(connection_id, room.id).await?;
        if let Some(entry) = self.registry().lookup(connection_id).await {
            self.directory()
                .select_room(entry.connection.identity.user_id, room.id)
                .await;
        }
        Ok(outcome)
    }

    /// Leave the current room, if any, and forget the user's selection
    pub async fn leave_room(&self, connection_id: ConnectionId) -> Option<LeaveOutcome> {
        let entry = self.registry().lookup(connection_id).await?;
        let outcome = self.directory().leave_room(self.registry(), connection_id).await;
        self.directory()
            .clear_selection(entry.connection.identity.user_id)
            .await;

        if let Some(left) = &outcome {
            tracing::info!(connection_id = %connection_id, room_id = %left.room_id, "[Hub] Connection left room");
            self.notify(
                left.room_id,
                &ServerEvent::PlayerLeftChatNotification {
                    screen_name: left.screen_name.clone(),
                },
            )
            .await;
        }
        outcome
    }

    /// Record a user's room choice and move their live connections into it
    ///
    /// # Returns
    /// The room and how many of the user's connections are now in it
    pub async fn select_room(&self, user_id: Uuid, raw_game_id: &str) -> Result<(Arc<Room>, usize), ChatError> {
        let room = self.directory().find(raw_game_id).await?;
        self.directory().select_room(user_id, room.id).await;

        let mut joined = 0;
        for connection_id in self.registry().connections_of_user(user_id).await {
            match self.join_room_id(connection_id, room.id).await {
                Ok(_) => joined += 1,
                Err(ChatError::ConnectionNotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }
        tracing::info!(user_id = %user_id, room_id = %room.id, "[Games] User selected room ({} live connections)", joined);
        Ok((room, joined))
    }

    /// Deliver an event to every current member of a room
    ///
    /// Failed recipients are removed; the report still covers them.
    pub async fn broadcast(&self, room_id: RoomId, event: &ServerEvent) -> Result<DeliveryReport, ChatError> {
        if self.directory().get(room_id).await.is_none() {
            return Err(ChatError::room_not_found(room_id));
        }
        Ok(self.notify(room_id, event).await)
    }

    /// Accept a chat message from a connection and fan it out to its room
    ///
    /// # Errors
    /// `InvalidMessage` for an empty or over-long body, `NotInRoom` when the
    /// connection has not joined a room.
    pub async fn post_message(&self, connection_id: ConnectionId, body: &str) -> Result<DeliveryReport, ChatError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ChatError::invalid_message("message must not be empty"));
        }
        if body.chars().count() > self.inner.max_message_len {
            return Err(ChatError::invalid_message(format!(
                "message longer than {} characters",
                self.inner.max_message_len
            )));
        }

        let entry = self
            .registry()
            .lookup(connection_id)
            .await
            .ok_or(ChatError::ConnectionNotFound(connection_id))?;
        let room_id = entry.room_id.ok_or(ChatError::NotInRoom)?;
        let room = self
            .directory()
            .get(room_id)
            .await
            .ok_or_else(|| ChatError::room_not_found(room_id))?;

        let event = ServerEvent::MessageReceivedNotification {
            screen_name: entry.screen_name.clone(),
            message: body.to_string(),
        };
        let Some(payload) = encode(&event) else {
            return Ok(DeliveryReport::default());
        };

        let report = {
            let _delivery = room.lock_delivery().await;
            let recipients = {
                let mut state = room.lock_state().await;
                if !state.members.contains(&connection_id) {
                    return Err(ChatError::NotInRoom);
                }
                state
                    .history
                    .push(ChatMessage::new(room_id, entry.screen_name, body));
                self.registry().resolve(state.members.iter()).await
            };
            fan_out(&recipients, &payload)
        };

        tracing::debug!(
            connection_id = %connection_id,
            room_id = %room_id,
            "[Hub] Message delivered to {}/{} members",
            report.delivered.len(),
            report.attempts()
        );
        self.evict(report.failed_ids()).await;
        Ok(report)
    }

    /// Buffered messages of the connection's room; empty outside a room
    pub async fn messages_for(&self, connection_id: ConnectionId) -> Result<Vec<VisibleMessage>, ChatError> {
        let Some(room_id) = self.registry().room_of(connection_id).await? else {
            return Ok(Vec::new());
        };
        match self.directory().get(room_id).await {
            Some(room) => Ok(room.history().await),
            None => Ok(Vec::new()),
        }
    }

    /// Sorted screen names in the connection's room; empty outside a room
    pub async fn players_for(&self, connection_id: ConnectionId) -> Result<Vec<String>, ChatError> {
        let Some(room_id) = self.registry().room_of(connection_id).await? else {
            return Ok(Vec::new());
        };
        let mut names: Vec<String> = self
            .registry()
            .list_by_room(self.directory(), room_id)
            .await?
            .into_iter()
            .map(|entry| entry.screen_name)
            .collect();
        names.sort();
        Ok(names)
    }

    pub async fn set_screen_name(&self, connection_id: ConnectionId, screen_name: &str) -> Result<(), ChatError> {
        self.registry().set_screen_name(connection_id, screen_name).await
    }

    /// Send an event to one connection
    ///
    /// A connection whose queue is closed or full is removed.
    pub async fn send_to(&self, connection_id: ConnectionId, event: &ServerEvent) -> Result<(), DeliveryFailure> {
        let Some(entry) = self.registry().lookup(connection_id).await else {
            return Err(DeliveryFailure::Closed);
        };
        let Some(payload) = encode(event) else {
            return Ok(());
        };
        let result = match entry.connection.try_send(OutboundFrame::Event(payload)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Closed(_)) => Err(DeliveryFailure::Closed),
            Err(TrySendError::Full(_)) => Err(DeliveryFailure::Full),
        };
        if result.is_err() {
            self.evict(vec![connection_id]).await;
        }
        result
    }

    pub async fn stats(&self) -> HubStats {
        HubStats {
            connections: self.registry().len().await,
            rooms: self.directory().len().await,
        }
    }

    async fn join_room_id(&self, connection_id: ConnectionId, room_id: RoomId) -> Result<JoinOutcome, ChatError> {
        let outcome = self
            .directory()
            .join_room(self.registry(), room_id, connection_id)
            .await?;

        // Delivery failures here evict the joiner, which the caller sees on its next frame
        let _ = self
            .send_to(
                connection_id,
                &ServerEvent::JoinGameResponse {
                    game_id: outcome.room_id,
                    name: outcome.room_name.clone(),
                },
            )
            .await;

        if outcome.changed {
            tracing::info!(connection_id = %connection_id, room_id = %room_id, "[Hub] Connection joined room");
            if let Some(previous) = outcome.previous {
                self.notify(
                    previous,
                    &ServerEvent::PlayerLeftChatNotification {
                        screen_name: outcome.screen_name.clone(),
                    },
                )
                .await;
            }
            self.notify(
                room_id,
                &ServerEvent::PlayerJoinedChatNotification {
                    screen_name: outcome.screen_name.clone(),
                },
            )
            .await;
        }
        Ok(outcome)
    }

    /// Deliver to a room, then evict whoever failed
    async fn notify(&self, room_id: RoomId, event: &ServerEvent) -> DeliveryReport {
        let report = self.deliver_to_room(room_id, event).await;
        self.evict(report.failed_ids()).await;
        report
    }

    async fn deliver_to_room(&self, room_id: RoomId, event: &ServerEvent) -> DeliveryReport {
        let Some(room) = self.directory().get(room_id).await else {
            return DeliveryReport::default();
        };
        let Some(payload) = encode(event) else {
            return DeliveryReport::default();
        };

        let _delivery = room.lock_delivery().await;
        let recipients = {
            let state = room.lock_state().await;
            self.registry().resolve(state.members.iter()).await
        };
        fan_out(&recipients, &payload)
    }

    /// Remove connections and announce each departure exactly once
    ///
    /// # Returns
    /// How many connections were actually removed
    async fn evict(&self, connection_ids: Vec<ConnectionId>) -> usize {
        let mut queue: VecDeque<ConnectionId> = connection_ids.into();
        let mut removed = 0;

        while let Some(connection_id) = queue.pop_front() {
            let Some(entry) = self
                .directory()
                .remove_connection(self.registry(), connection_id)
                .await
            else {
                continue;
            };
            removed += 1;
            entry.connection.close();
            tracing::info!(connection_id = %connection_id, "[Hub] Connection removed");

            if let Some(room_id) = entry.room_id {
                let report = self
                    .deliver_to_room(
                        room_id,
                        &ServerEvent::PlayerLeftChatNotification {
                            screen_name: entry.screen_name,
                        },
                    )
                    .await;
                queue.extend(report.failed_ids());
            }
        }
        removed
    }
}

fn encode(event: &ServerEvent) -> Option<Arc<str>> {
    match encode_event(event) {
        Ok(payload) => Some(payload),
        Err(err) => {
            tracing::error!("[Hub] Failed to encode {} event: {}", event.kind(), err);
            None
        }
    }
}
