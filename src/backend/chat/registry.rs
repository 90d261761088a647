/**
 * Connection Registry
 *
 * The registry exclusively owns every live connection, keyed by connection
 * id. Rooms refer to connections only by id and resolve them through the
 * registry at delivery time, so a connection that has been unregistered
 * simply disappears from future room snapshots.
 *
 * # Locking
 *
 * The registry map sits behind its own `RwLock`. Code that changes which room
 * a connection belongs to holds the affected room locks first and then takes
 * the registry lock (rooms → registry, never the reverse), which keeps a
 * room's member set and the registry's `room_id` fields in agreement for
 * every observer that goes through the room.
 */

use crate::backend::auth::sessions::UserIdentity;
use crate::backend::chat::directory::RoomDirectory;
use crate::shared::{ChatError, ConnectionId, RoomId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{Notify, RwLock};
use uuid::Uuid;

/// Frame queued for a connection's socket writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// A serialized `ServerEvent`, shared between all recipients of a broadcast
    Event(Arc<str>),
    /// Heartbeat ping
    Ping,
    /// Close the socket with a code and reason
    Close { code: u16, reason: String },
}

/// Sending half of a connection's outbound queue
pub type OutboundSender = mpsc::Sender<OutboundFrame>;

/// One live socket connection
///
/// Immutable apart from its queue; the mutable parts of a connection (current
/// room, screen name) live in the registry entry.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub identity: UserIdentity,
    outbound: OutboundSender,
    shutdown: Arc<Notify>,
}

impl Connection {
    pub fn new(id: ConnectionId, identity: UserIdentity, outbound: OutboundSender) -> Self {
        Self {
            id,
            identity,
            outbound,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Queue a frame without waiting
    pub fn try_send(&self, frame: OutboundFrame) -> Result<(), TrySendError<OutboundFrame>> {
        self.outbound.try_send(frame)
    }

    /// Ask the connection's worker to stop
    pub fn close(&self) {
        self.shutdown.notify_one();
    }

    /// Signal fired by [`Connection::close`]
    pub fn shutdown_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }
}

/// Snapshot of a registry entry
#[derive(Debug, Clone)]
pub struct ConnectionEntry {
    pub connection: Arc<Connection>,
    pub room_id: Option<RoomId>,
    pub screen_name: String,
}

/// Result of a conditional removal
#[derive(Debug)]
pub(crate) enum Removal {
    Removed(ConnectionEntry),
    /// The connection is registered but no longer in the expected room
    Moved,
    Missing,
}

/// Thread-safe registry of live connections
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: RwLock<HashMap<ConnectionId, ConnectionEntry>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection
    ///
    /// The connection starts outside any room with its identity's display
    /// name as screen name.
    ///
    /// # Errors
    /// `DuplicateConnection` if the id is already registered.
    pub async fn register(&self, connection: Connection) -> Result<Arc<Connection>, ChatError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&connection.id) {
            return Err(ChatError::DuplicateConnection(connection.id));
        }
        let connection = Arc::new(connection);
        entries.insert(
            connection.id,
            ConnectionEntry {
                connection: Arc::clone(&connection),
                room_id: None,
                screen_name: connection.identity.display_name.clone(),
            },
        );
        tracing::debug!(connection_id = %connection.id, "[Registry] Connection registered");
        Ok(connection)
    }

    /// Remove a connection regardless of room membership
    ///
    /// Idempotent. Callers that need the room's member set kept in step use
    /// `RoomDirectory::remove_connection` instead.
    pub async fn unregister(&self, id: ConnectionId) -> Option<ConnectionEntry> {
        self.entries.write().await.remove(&id)
    }

    pub async fn lookup(&self, id: ConnectionId) -> Option<ConnectionEntry> {
        self.entries.read().await.get(&id).cloned()
    }

    /// Room the connection currently belongs to
    pub async fn room_of(&self, id: ConnectionId) -> Result<Option<RoomId>, ChatError> {
        self.entries
            .read()
            .await
            .get(&id)
            .map(|entry| entry.room_id)
            .ok_or(ChatError::ConnectionNotFound(id))
    }

    /// Live connections of a room, as a consistent snapshot
    ///
    /// Holds the room's lock while resolving ids, so no connection that has
    /// left the room (or is leaving it) can appear.
    pub async fn list_by_room(
        &self,
        directory: &RoomDirectory,
        room_id: RoomId,
    ) -> Result<Vec<ConnectionEntry>, ChatError> {
        let room = directory
            .get(room_id)
            .await
            .ok_or_else(|| ChatError::room_not_found(room_id))?;
        let state = room.lock_state().await;
        Ok(self.resolve(state.members.iter()).await)
    }

    /// Ids of every live connection opened by a user
    pub async fn connections_of_user(&self, user_id: Uuid) -> Vec<ConnectionId> {
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.connection.identity.user_id == user_id)
            .map(|entry| entry.connection.id)
            .collect()
    }

    /// Change the screen name shown for a connection's messages
    pub async fn set_screen_name(&self, id: ConnectionId, screen_name: &str) -> Result<(), ChatError> {
        let screen_name = screen_name.trim();
        if screen_name.is_empty() {
            return Err(ChatError::InvalidScreenName);
        }
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id).ok_or(ChatError::ConnectionNotFound(id))?;
        entry.screen_name = screen_name.to_string();
        Ok(())
    }

    /// Number of live connections
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Resolve member ids to entries, skipping ids that are gone
    pub(crate) async fn resolve<'a, I>(&self, ids: I) -> Vec<ConnectionEntry>
    where
        I: Iterator<Item = &'a ConnectionId>,
    {
        let entries = self.entries.read().await;
        ids.filter_map(|id| entries.get(id).cloned()).collect()
    }

    /// Move a connection between rooms if it is still where the caller saw it
    ///
    /// Must be called with the locks of both rooms held. On success returns the
    /// screen name read under the same write lock, so the caller can announce
    /// the move even if the connection is removed right after.
    pub(crate) async fn compare_and_set_room(
        &self,
        id: ConnectionId,
        expected: Option<RoomId>,
        room_id: Option<RoomId>,
    ) -> Result<Option<String>, ChatError> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id).ok_or(ChatError::ConnectionNotFound(id))?;
        if entry.room_id != expected {
            return Ok(None);
        }
        entry.room_id = room_id;
        Ok(Some(entry.screen_name.clone()))
    }

    /// Remove a connection if it is still in the expected room
    ///
    /// Must be called with that room's lock held.
    pub(crate) async fn remove_if_in(&self, id: ConnectionId, expected: Option<RoomId>) -> Removal {
        let mut entries = self.entries.write().await;
        match entries.get(&id) {
            None => Removal::Missing,
            Some(entry) if entry.room_id != expected => Removal::Moved,
            Some(_) => entries
                .remove(&id)
                .map_or(Removal::Missing, Removal::Removed),
        }
    }
}
