/**
 * Socket Endpoint
 *
 * `GET <websocket_path>` upgrades to a WebSocket after the credential has
 * been verified. The credential comes from `?token=` or, failing that, the
 * `authToken` cookie. A bad credential refuses the upgrade with 401; nothing
 * is registered.
 *
 * # Connection worker
 *
 * Each connection runs one worker:
 * - A writer task owns the socket sink and drains the bounded outbound queue
 * - The reader loop feeds text frames to the [`Session`], sends heartbeat
 *   pings and watches for idleness and for eviction by the hub
 *
 * Close codes: 1003 for binary frames, 1007 for malformed JSON, 1001 for
 * idle timeout or eviction, 1011 for internal failures.
 */

use crate::backend::auth::cookies::cookie_token;
use crate::backend::chat::{Connection, OutboundFrame};
use crate::backend::error::BackendError;
use crate::backend::realtime::broadcast::encode_event;
use crate::backend::realtime::session::Session;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;
use crate::shared::{ChatError, ConnectionId, ServerEvent};
use axum::{
    body::Bytes,
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, timeout, Instant, MissedTickBehavior};

pub const CLOSE_GOING_AWAY: u16 = 1001;
pub const CLOSE_UNSUPPORTED_DATA: u16 = 1003;
pub const CLOSE_INVALID_PAYLOAD: u16 = 1007;
pub const CLOSE_INTERNAL_ERROR: u16 = 1011;

/// How long the writer may take to flush after the reader stops
const WRITER_GRACE: Duration = Duration::from_secs(2);

/// Query parameters of the upgrade request
#[derive(Debug, Deserialize)]
pub struct SocketAuthQuery {
    pub token: Option<String>,
}

/// Per-connection limits, taken from the server config
#[derive(Debug, Clone, Copy)]
pub struct SocketSettings {
    pub outbound_queue: usize,
    pub heartbeat_interval: Duration,
    pub idle_timeout: Duration,
}

impl SocketSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            outbound_queue: config.outbound_queue,
            heartbeat_interval: config.heartbeat_interval(),
            idle_timeout: config.idle_timeout(),
        }
    }
}

/// GET /websocket?token=JWT
///
/// Verifies the credential before upgrading.
///
/// # Errors
///
/// * `401 Unauthorized` - Missing, malformed, expired or forged credential
pub async fn handle_socket_upgrade(
    State(state): State<AppState>,
    Query(query): Query<SocketAuthQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, BackendError> {
    let credential = query
        .token
        .filter(|token| !token.trim().is_empty())
        .or_else(|| cookie_token(&headers));

    let mut session = Session::connecting(state.hub.clone());
    let identity = session.authenticate(&state.tokens, credential.as_deref())?;
    tracing::info!(user_id = %identity.user_id, "[Session] Socket authenticated");

    let settings = SocketSettings::from_config(&state.config);
    Ok(ws.on_upgrade(move |socket| run_connection(socket, session, settings)))
}

/// Drive one authenticated socket until it closes
pub async fn run_connection(socket: WebSocket, mut session: Session, settings: SocketSettings) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (tx, rx) = mpsc::channel::<OutboundFrame>(settings.outbound_queue);
    let writer_handle = tokio::spawn(writer_task(ws_sender, rx));

    let connection = match session.attach(ConnectionId::new(), tx.clone()).await {
        Ok(connection) => connection,
        Err(err) => {
            tracing::error!("[Session] Failed to register connection: {}", err);
            let _ = tx.try_send(OutboundFrame::Close {
                code: CLOSE_INTERNAL_ERROR,
                reason: "registration failed".to_string(),
            });
            drop(tx);
            finish_writer(writer_handle).await;
            return;
        }
    };
    tracing::info!(connection_id = %connection.id, "[Session] WebSocket worker started");

    let shutdown = connection.shutdown_signal();
    let mut heartbeat = interval(settings.heartbeat_interval);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    heartbeat.tick().await;
    let mut last_seen = Instant::now();

    let close = loop {
        tokio::select! {
            _ = shutdown.notified() => {
                tracing::info!(connection_id = %connection.id, "[Session] Removed by hub");
                break Some((CLOSE_GOING_AWAY, "removed by server".to_string()));
            }
            _ = heartbeat.tick() => {
                if last_seen.elapsed() > settings.idle_timeout {
                    tracing::info!(connection_id = %connection.id, "[Session] Idle timeout");
                    break Some((CLOSE_GOING_AWAY, "idle timeout".to_string()));
                }
                if connection.try_send(OutboundFrame::Ping).is_err() {
                    break None;
                }
            }
            incoming = ws_receiver.next() => {
                last_seen = Instant::now();
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(err) = session.handle_text(text.as_str()).await {
                            break Some(close_for(&connection, &err));
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::warn!(connection_id = %connection.id, "[Session] Binary frame rejected");
                        break Some((CLOSE_UNSUPPORTED_DATA, "binary frames are not supported".to_string()));
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(connection_id = %connection.id, reason = ?frame, "[Session] Client initiated close");
                        break None;
                    }
                    Some(Err(err)) => {
                        tracing::warn!(connection_id = %connection.id, error = %err, "[Session] Receive error");
                        break None;
                    }
                    None => {
                        tracing::info!(connection_id = %connection.id, "[Session] Stream ended");
                        break None;
                    }
                }
            }
        }
    };

    session.close().await;
    if let Some((code, reason)) = close {
        let _ = tx.try_send(OutboundFrame::Close { code, reason });
    }
    let connection_id = connection.id;
    drop(connection);
    drop(tx);
    finish_writer(writer_handle).await;

    tracing::info!(connection_id = %connection_id, "[Session] WebSocket worker stopped");
}

/// Close code for an error that ended the session
///
/// Malformed frames are acknowledged with an error frame before closing.
fn close_for(connection: &Connection, err: &ChatError) -> (u16, String) {
    match err {
        ChatError::MalformedFrame { .. } => {
            if let Ok(payload) = encode_event(&ServerEvent::error(err)) {
                let _ = connection.try_send(OutboundFrame::Event(payload));
            }
            (CLOSE_INVALID_PAYLOAD, "malformed frame".to_string())
        }
        ChatError::ConnectionNotFound(_) => (CLOSE_GOING_AWAY, "removed by server".to_string()),
        _ => (CLOSE_INTERNAL_ERROR, err.to_string()),
    }
}

/// Writer task: forwards queued frames to the WebSocket sink
async fn writer_task(mut ws_sender: SplitSink<WebSocket, Message>, mut rx: mpsc::Receiver<OutboundFrame>) {
    while let Some(frame) = rx.recv().await {
        let (message, last) = match frame {
            OutboundFrame::Event(payload) => (Message::Text(payload.as_ref().into()), false),
            OutboundFrame::Ping => (Message::Ping(Bytes::new()), false),
            OutboundFrame::Close { code, reason } => (
                Message::Close(Some(CloseFrame {
                    code,
                    reason: reason.into(),
                })),
                true,
            ),
        };
        if ws_sender.send(message).await.is_err() {
            break;
        }
        if last {
            break;
        }
    }
    let _ = ws_sender.close().await;
}

async fn finish_writer(writer_handle: tokio::task::JoinHandle<()>) {
    let abort = writer_handle.abort_handle();
    if timeout(WRITER_GRACE, writer_handle).await.is_err() {
        tracing::debug!("[Session] Writer did not finish in time, aborting");
        abort.abort();
    }
}
