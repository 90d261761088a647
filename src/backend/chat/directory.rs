/**
 * Room Directory
 *
 * Authoritative store of rooms plus the membership operations that have to
 * stay consistent with the connection registry.
 *
 * # Membership protocol
 *
 * A connection's room is recorded twice: in the room's member set and in the
 * registry entry's `room_id`. Every change to either happens with the
 * affected room locks held (two rooms are locked in `RoomId` order), and the
 * registry side is a compare-and-set against the room the caller observed
 * before locking. If another worker moved the connection in between, the
 * compare fails and the operation retries with fresh state. There is no
 * global lock across rooms.
 */

use crate::backend::chat::registry::{ConnectionEntry, ConnectionRegistry, Removal};
use crate::backend::chat::room::{Room, RoomState, RoomSummary};
use crate::shared::{ChatError, ConnectionId, RoomId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{MutexGuard, RwLock};
use uuid::Uuid;

/// Result of a successful join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room_id: RoomId,
    pub room_name: String,
    /// Room the connection was implicitly removed from
    pub previous: Option<RoomId>,
    pub screen_name: String,
    /// False when the connection was already a member
    pub changed: bool,
}

/// Result of a leave that actually removed the connection from a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    pub screen_name: String,
}

#[derive(Debug, Default)]
struct RoomIndex {
    order: Vec<Arc<Room>>,
    by_id: HashMap<RoomId, Arc<Room>>,
}

/// Store of rooms and per-user room selections
#[derive(Debug)]
pub struct RoomDirectory {
    rooms: RwLock<RoomIndex>,
    selections: RwLock<HashMap<Uuid, RoomId>>,
    history_capacity: usize,
}

impl RoomDirectory {
    /// Create an empty directory
    ///
    /// # Arguments
    /// * `history_capacity` - Messages retained per room for replay
    pub fn new(history_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(RoomIndex::default()),
            selections: RwLock::new(HashMap::new()),
            history_capacity,
        }
    }

    /// Create a room
    ///
    /// A missing name becomes `Game <n>`; a present name is trimmed and must
    /// not be empty.
    ///
    /// # Errors
    /// `InvalidRoomName` for an empty or whitespace-only name. No room is
    /// created in that case.
    pub async fn create_room(&self, name: Option<&str>, owner: Uuid) -> Result<Arc<Room>, ChatError> {
        let name = match name {
            Some(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(ChatError::invalid_room_name("name must not be empty"));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let mut index = self.rooms.write().await;
        let name = name.unwrap_or_else(|| format!("Game {}", index.order.len() + 1));
        let room = Arc::new(Room::new(name, owner, self.history_capacity));
        index.by_id.insert(room.id, Arc::clone(&room));
        index.order.push(Arc::clone(&room));

        tracing::info!(room_id = %room.id, "[Games] Created room '{}'", room.name);
        Ok(room)
    }

    /// Rooms in creation order
    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        self.rooms.read().await.order.iter().map(|room| room.summary()).collect()
    }

    pub async fn get(&self, id: RoomId) -> Option<Arc<Room>> {
        self.rooms.read().await.by_id.get(&id).cloned()
    }

    /// Look up a room from a client-supplied id string
    pub async fn find(&self, raw_id: &str) -> Result<Arc<Room>, ChatError> {
        let id: RoomId = raw_id.parse().map_err(|_| ChatError::room_not_found(raw_id))?;
        self.get(id).await.ok_or_else(|| ChatError::room_not_found(raw_id))
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.order.is_empty()
    }

    /// Put a connection in a room, leaving its previous room if any
    ///
    /// # Errors
    /// `RoomNotFound` for an unknown room, `ConnectionNotFound` if the
    /// connection is not registered. Nothing changes on error.
    pub async fn join_room(
        &self,
        registry: &ConnectionRegistry,
        room_id: RoomId,
        connection_id: ConnectionId,
    ) -> Result<JoinOutcome, ChatError> {
        let target = self
            .get(room_id)
            .await
            .ok_or_else(|| ChatError::room_not_found(room_id))?;

        loop {
            let current = registry.room_of(connection_id).await?;

            if current == Some(room_id) {
                let state = target.lock_state().await;
                let entry = registry
                    .lookup(connection_id)
                    .await
                    .ok_or(ChatError::ConnectionNotFound(connection_id))?;
                if entry.room_id != Some(room_id) {
                    continue;
                }
                debug_assert!(state.members.contains(&connection_id));
                drop(state);
                return Ok(joined(&target, None, entry.screen_name, false));
            }

            let previous = match current {
                Some(previous_id) => self.get(previous_id).await,
                None => None,
            };

            let (mut target_state, previous_state) = match previous.as_deref() {
                Some(previous) => {
                    let (target_state, previous_state) = lock_pair(&target, previous).await;
                    (target_state, Some(previous_state))
                }
                None => (target.lock_state().await, None),
            };

            let Some(screen_name) = registry
                .compare_and_set_room(connection_id, current, Some(room_id))
                .await?
            else {
                continue;
            };
            if let Some(mut previous_state) = previous_state {
                previous_state.members.remove(&connection_id);
            }
            target_state.members.insert(connection_id);
            drop(target_state);

            tracing::debug!(
                connection_id = %connection_id,
                room_id = %room_id,
                "[Games] Connection joined room"
            );
            return Ok(joined(&target, current, screen_name, true));
        }
    }

    /// Take a connection out of its room
    ///
    /// Idempotent: returns `None` when the connection is in no room or is not
    /// registered.
    pub async fn leave_room(
        &self,
        registry: &ConnectionRegistry,
        connection_id: ConnectionId,
    ) -> Option<LeaveOutcome> {
        loop {
            let room_id = registry.room_of(connection_id).await.ok()??;
            let room = self.get(room_id).await?;

            let mut state = room.lock_state().await;
            let screen_name = match registry
                .compare_and_set_room(connection_id, Some(room_id), None)
                .await
            {
                Ok(Some(screen_name)) => screen_name,
                Ok(None) => continue,
                Err(_) => return None,
            };
            state.members.remove(&connection_id);
            drop(state);

            return Some(LeaveOutcome { room_id, screen_name });
        }
    }

    /// Unregister a connection and drop it from its room in one step
    ///
    /// Only the first caller for a given connection gets the entry back, so
    /// exactly one leave notification is emitted per connection.
    pub async fn remove_connection(
        &self,
        registry: &ConnectionRegistry,
        connection_id: ConnectionId,
    ) -> Option<ConnectionEntry> {
        loop {
            let entry = registry.lookup(connection_id).await?;
            let room = match entry.room_id {
                Some(room_id) => self.get(room_id).await,
                None => None,
            };

            let removal = match room.as_deref() {
                Some(room) => {
                    let mut state = room.lock_state().await;
                    let removal = registry.remove_if_in(connection_id, Some(room.id)).await;
                    if matches!(removal, Removal::Removed(_)) {
                        state.members.remove(&connection_id);
                    }
                    removal
                }
                None => registry.remove_if_in(connection_id, entry.room_id).await,
            };

            match removal {
                Removal::Removed(entry) => return Some(entry),
                Removal::Moved => continue,
                Removal::Missing => return None,
            }
        }
    }

    /// Remember the room a user picked over REST
    pub async fn select_room(&self, user_id: Uuid, room_id: RoomId) {
        self.selections.write().await.insert(user_id, room_id);
    }

    pub async fn selected_room(&self, user_id: Uuid) -> Option<RoomId> {
        self.selections.read().await.get(&user_id).copied()
    }

    pub async fn clear_selection(&self, user_id: Uuid) {
        self.selections.write().await.remove(&user_id);
    }

}

fn joined(room: &Room, previous: Option<RoomId>, screen_name: String, changed: bool) -> JoinOutcome {
    JoinOutcome {
        room_id: room.id,
        room_name: room.name.clone(),
        previous,
        screen_name,
        changed,
    }
}

/// Lock two distinct rooms in id order; guards come back as (first, second)
async fn lock_pair<'a>(
    first: &'a Room,
    second: &'a Room,
) -> (MutexGuard<'a, RoomState>, MutexGuard<'a, RoomState>) {
    if first.id < second.id {
        let first_guard = first.lock_state().await;
        let second_guard = second.lock_state().await;
        (first_guard, second_guard)
    } else {
        let second_guard = second.lock_state().await;
        let first_guard = first.lock_state().await;
        (first_guard, second_guard)
    }
}
