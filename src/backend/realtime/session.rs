/**
 * Session Protocol Handler
 *
 * Per-connection state machine that interprets inbound frames and drives the
 * chat hub:
 *
 * ```text
 * Connecting ──verify ok──▶ Authenticated ──joinGame──▶ RoomJoined(room)
 *     │                         ▲      │                   │   ▲
 *     │ verify failed           │      └──────────┐        │   │ joinGame (switch)
 *     ▼                         └── leaveGame ────┼────────┘───┘
 *   Closed ◀──── socket close / malformed frame / eviction (from any state)
 * ```
 *
 * The room part of the state is re-read from the registry around every frame,
 * because a REST `/games/join` can move the connection between frames.
 *
 * Recoverable errors (`NotInRoom`, `RoomNotFound`, validation) are answered
 * with an `{type:"error"}` frame and the connection stays open. Fatal ones
 * are returned to the socket worker, which closes the connection.
 */

use crate::backend::auth::sessions::{TokenKeys, UserIdentity};
use crate::backend::chat::{ChatHub, Connection, OutboundSender};
use crate::shared::{ChatError, ClientFrame, ConnectionId, RoomId, ServerEvent};
use std::sync::Arc;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Authenticated,
    RoomJoined(RoomId),
    Closed,
}

/// One connection's protocol state
#[derive(Debug)]
pub struct Session {
    hub: ChatHub,
    state: SessionState,
    identity: Option<UserIdentity>,
    connection: Option<Arc<Connection>>,
}

impl Session {
    /// New session waiting for credential verification
    pub fn connecting(hub: ChatHub) -> Self {
        Self {
            hub,
            state: SessionState::Connecting,
            identity: None,
            connection: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection.as_ref().map(|connection| connection.id)
    }

    /// Verify the presented credential
    ///
    /// Runs before anything is registered. On failure the session is closed
    /// and the upgrade must be refused.
    pub fn authenticate(&mut self, keys: &TokenKeys, credential: Option<&str>) -> Result<UserIdentity, ChatError> {
        if self.state != SessionState::Connecting {
            return Err(ChatError::unauthenticated("session is not awaiting a credential"));
        }
        match keys.verify(credential) {
            Ok(identity) => {
                self.identity = Some(identity.clone());
                self.state = SessionState::Authenticated;
                Ok(identity)
            }
            Err(err) => {
                tracing::warn!("[Session] Handshake rejected: {}", err);
                self.state = SessionState::Closed;
                Err(err)
            }
        }
    }

    /// Register the connection once the socket is open
    ///
    /// The connection may land straight in the user's selected room.
    pub async fn attach(&mut self, id: ConnectionId, outbound: OutboundSender) -> Result<Arc<Connection>, ChatError> {
        let identity = match (&self.state, &self.identity) {
            (SessionState::Authenticated, Some(identity)) => identity.clone(),
            _ => return Err(ChatError::unauthenticated("session is not authenticated")),
        };

        let connection = self.hub.connect(Connection::new(id, identity, outbound)).await?;
        self.connection = Some(Arc::clone(&connection));
        self.refresh().await?;
        Ok(connection)
    }

    /// Handle one inbound text frame
    ///
    /// # Errors
    ///
    /// Only errors that end the session: `MalformedFrame`, or
    /// `ConnectionNotFound` when the hub already removed this connection.
    pub async fn handle_text(&mut self, text: &str) -> Result<(), ChatError> {
        let connection_id = self
            .connection_id()
            .filter(|_| self.state != SessionState::Closed)
            .ok_or_else(|| ChatError::unauthenticated("session is not attached"))?;

        let frame = ClientFrame::parse(text).map_err(|err| {
            tracing::warn!(connection_id = %connection_id, "[Session] Malformed frame: {}", err);
            err
        })?;
        self.refresh().await?;

        match self.dispatch(connection_id, frame).await {
            Ok(()) => {}
            Err(err) if ends_session(&err) => {
                self.state = SessionState::Closed;
                return Err(err);
            }
            Err(err) => {
                tracing::debug!(connection_id = %connection_id, "[Session] Rejected frame: {}", err);
                self.reply(connection_id, ServerEvent::error(&err)).await?;
            }
        }
        self.refresh().await
    }

    /// Tear the session down; safe to call more than once
    pub async fn close(&mut self) {
        if let Some(connection) = &self.connection {
            if self.hub.disconnect(connection.id).await {
                tracing::info!(connection_id = %connection.id, "[Session] Closed");
            }
        }
        self.state = SessionState::Closed;
    }

    async fn dispatch(&mut self, connection_id: ConnectionId, frame: ClientFrame) -> Result<(), ChatError> {
        match frame {
            ClientFrame::GetMessages => {
                let messages = self.hub.messages_for(connection_id).await?;
                self.reply(connection_id, ServerEvent::GetMessagesResponse { messages })
                    .await
            }
            ClientFrame::SendMessage { message } => {
                if !matches!(self.state, SessionState::RoomJoined(_)) {
                    return Err(ChatError::NotInRoom);
                }
                self.hub.post_message(connection_id, &message).await.map(|_| ())
            }
            ClientFrame::GetPlayers => {
                let screen_names = self.hub.players_for(connection_id).await?;
                self.reply(connection_id, ServerEvent::GetPlayersResponse { screen_names })
                    .await
            }
            ClientFrame::SetScreenName { screen_name } => {
                self.hub.set_screen_name(connection_id, &screen_name).await
            }
            ClientFrame::JoinGame { game_id } => {
                let outcome = self.hub.join_room(connection_id, &game_id).await?;
                self.state = SessionState::RoomJoined(outcome.room_id);
                Ok(())
            }
            ClientFrame::LeaveGame => {
                self.hub.leave_room(connection_id).await;
                self.state = SessionState::Authenticated;
                Ok(())
            }
            ClientFrame::Unknown => {
                tracing::debug!(connection_id = %connection_id, "[Session] Ignoring frame of unknown type");
                Ok(())
            }
        }
    }

    async fn reply(&self, connection_id: ConnectionId, event: ServerEvent) -> Result<(), ChatError> {
        self.hub
            .send_to(connection_id, &event)
            .await
            .map_err(|_| ChatError::ConnectionNotFound(connection_id))
    }

    /// Re-read the room from the registry
    async fn refresh(&mut self) -> Result<(), ChatError> {
        let Some(connection_id) = self.connection_id() else {
            return Ok(());
        };
        match self.hub.registry().room_of(connection_id).await {
            Ok(Some(room_id)) => self.state = SessionState::RoomJoined(room_id),
            Ok(None) => self.state = SessionState::Authenticated,
            Err(err) => {
                self.state = SessionState::Closed;
                return Err(err);
            }
        }
        Ok(())
    }
}

fn ends_session(err: &ChatError) -> bool {
    err.is_fatal() || matches!(err, ChatError::ConnectionNotFound(_))
}
