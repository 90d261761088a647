/**
 * Chat Client Driver
 *
 * Runs one background task per client that owns the socket and executes the
 * [`ReconnectController`]'s actions:
 * - connects with `tokio-tungstenite`
 * - sends `getMessages` after every successful open so the view resyncs
 * - forwards server events and state changes to the application
 * - relays outgoing frames while the socket is open
 *
 * Frames sent while the socket is down are dropped with a warning; the resync
 * after reconnect restores the message view.
 */

use crate::client::error::{ClientError, ClientResult};
use crate::client::reconnect::{ConnectionState, LifecycleEvent, ReconnectAction, ReconnectController};
use crate::shared::{ClientConfig, ClientFrame, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Capacity of the command and event channels
const CHANNEL_CAPACITY: usize = 64;

/// Events delivered to the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The connection state changed
    StateChanged(ConnectionState),
    /// A frame from the server
    Server(ServerEvent),
    /// Reconnection was abandoned; the application should show a persistent error
    GaveUp { attempts: u32 },
}

#[derive(Debug)]
enum ClientCommand {
    Send(ClientFrame),
    Connect,
    Disconnect,
}

/// Why an open session ended
enum SessionEnd {
    /// The socket closed or failed
    Lost,
    /// The application disconnected
    Disconnected,
    /// The application dropped the client or its event receiver
    Abandoned,
}

/// Handle to a running chat client
///
/// Cloning the handle shares the same connection. The driver stops once all
/// handles are dropped.
#[derive(Debug, Clone)]
pub struct ChatClient {
    commands: mpsc::Sender<ClientCommand>,
}

impl ChatClient {
    /// Start the client and connect immediately
    ///
    /// # Returns
    ///
    /// The handle and the receiver of [`ClientEvent`]s.
    pub fn spawn(config: ClientConfig) -> (Self, mpsc::Receiver<ClientEvent>) {
        let (commands_tx, commands_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(drive(config, commands_rx, events_tx));
        (Self { commands: commands_tx }, events_rx)
    }

    /// Queue a frame for the server
    pub async fn send(&self, frame: ClientFrame) -> ClientResult<()> {
        self.command(ClientCommand::Send(frame)).await
    }

    pub async fn send_message(&self, message: impl Into<String>) -> ClientResult<()> {
        self.send(ClientFrame::SendMessage {
            message: message.into(),
        })
        .await
    }

    pub async fn join_game(&self, game_id: impl Into<String>) -> ClientResult<()> {
        self.send(ClientFrame::JoinGame {
            game_id: game_id.into(),
        })
        .await
    }

    pub async fn leave_game(&self) -> ClientResult<()> {
        self.send(ClientFrame::LeaveGame).await
    }

    pub async fn get_messages(&self) -> ClientResult<()> {
        self.send(ClientFrame::GetMessages).await
    }

    pub async fn get_players(&self) -> ClientResult<()> {
        self.send(ClientFrame::GetPlayers).await
    }

    pub async fn set_screen_name(&self, screen_name: impl Into<String>) -> ClientResult<()> {
        self.send(ClientFrame::SetScreenName {
            screen_name: screen_name.into(),
        })
        .await
    }

    /// Connect again after a disconnect or after giving up
    pub async fn connect(&self) -> ClientResult<()> {
        self.command(ClientCommand::Connect).await
    }

    /// Close the connection without reconnecting
    pub async fn disconnect(&self) -> ClientResult<()> {
        self.command(ClientCommand::Disconnect).await
    }

    async fn command(&self, command: ClientCommand) -> ClientResult<()> {
        self.commands.send(command).await.map_err(|_| ClientError::Stopped)
    }
}

/// Emits state changes as events, tracking the last state sent
struct Driver {
    config: ClientConfig,
    controller: ReconnectController,
    events: mpsc::Sender<ClientEvent>,
    reported: ConnectionState,
}

impl Driver {
    /// Feed an event to the controller and report any state change
    ///
    /// # Returns
    ///
    /// The action to execute, or `None` when the application is gone.
    async fn step(&mut self, event: LifecycleEvent) -> Option<ReconnectAction> {
        let action = self.controller.handle(event);
        let state = self.controller.state();
        if state != self.reported {
            self.reported = state;
            self.events.send(ClientEvent::StateChanged(state)).await.ok()?;
        }
        Some(action)
    }

    async fn emit(&self, event: ClientEvent) -> bool {
        self.events.send(event).await.is_ok()
    }
}

async fn drive(config: ClientConfig, mut commands: mpsc::Receiver<ClientCommand>, events: mpsc::Sender<ClientEvent>) {
    let controller = ReconnectController::new(config.reconnect_delay, config.max_reconnect_attempts);
    let mut driver = Driver {
        config,
        controller,
        events,
        reported: ConnectionState::Idle,
    };

    let mut next = driver.step(LifecycleEvent::ConnectRequested).await;
    while let Some(action) = next {
        next = match action {
            ReconnectAction::Connect => connect(&mut driver, &mut commands).await,
            ReconnectAction::ScheduleRetry(delay) => backoff(&mut driver, &mut commands, delay).await,
            ReconnectAction::GiveUp { attempts } => {
                if driver.emit(ClientEvent::GaveUp { attempts }).await {
                    wait_for_connect(&mut driver, &mut commands).await
                } else {
                    None
                }
            }
            // Resync and Close are handled inside the open session
            ReconnectAction::Resync | ReconnectAction::Close | ReconnectAction::None => {
                wait_for_connect(&mut driver, &mut commands).await
            }
        };
    }
    tracing::debug!("[Client] Driver stopped");
}

/// Attempt one connection and, on success, run the session until it ends
async fn connect(driver: &mut Driver, commands: &mut mpsc::Receiver<ClientCommand>) -> Option<ReconnectAction> {
    tracing::info!("[Client] Connecting to {}", driver.config.websocket_url);
    let socket = match connect_async(driver.config.websocket_url.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(err) => {
            tracing::warn!("[Client] Connection attempt failed: {}", err);
            return driver.step(LifecycleEvent::ConnectFailed).await;
        }
    };

    match driver.step(LifecycleEvent::Opened).await? {
        ReconnectAction::Resync => {}
        other => return Some(other),
    }

    match run_session(driver, commands, socket).await {
        SessionEnd::Lost => driver.step(LifecycleEvent::Closed { expected: false }).await,
        SessionEnd::Disconnected => driver.step(LifecycleEvent::Disconnect).await,
        SessionEnd::Abandoned => None,
    }
}

async fn run_session(driver: &Driver, commands: &mut mpsc::Receiver<ClientCommand>, socket: Socket) -> SessionEnd {
    let (mut sink, mut source) = socket.split();

    if let Err(err) = send_frame(&mut sink, &ClientFrame::GetMessages).await {
        tracing::warn!("[Client] Resync request failed: {}", err);
        return SessionEnd::Lost;
    }

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(ClientCommand::Send(frame)) => {
                    if let Err(err) = send_frame(&mut sink, &frame).await {
                        tracing::warn!("[Client] Send failed: {}", err);
                        return SessionEnd::Lost;
                    }
                }
                Some(ClientCommand::Connect) => {}
                Some(ClientCommand::Disconnect) => {
                    let _ = sink.send(Message::Close(None)).await;
                    let _ = sink.close().await;
                    return SessionEnd::Disconnected;
                }
                None => {
                    let _ = sink.close().await;
                    return SessionEnd::Abandoned;
                }
            },
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => {
                            if !driver.emit(ClientEvent::Server(event)).await {
                                let _ = sink.close().await;
                                return SessionEnd::Abandoned;
                            }
                        }
                        Err(err) => tracing::warn!("[Client] Unreadable server frame: {}", err),
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!("[Client] Server closed the connection: {:?}", frame);
                    return SessionEnd::Lost;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::warn!("[Client] Socket error: {}", err);
                    return SessionEnd::Lost;
                }
                None => return SessionEnd::Lost,
            },
        }
    }
}

async fn send_frame<S>(sink: &mut S, frame: &ClientFrame) -> Result<(), String>
where
    S: futures_util::Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let text = serde_json::to_string(frame).map_err(|err| err.to_string())?;
    sink.send(Message::text(text)).await.map_err(|err| err.to_string())
}

/// Wait out the retry delay while still honouring disconnects
async fn backoff(
    driver: &mut Driver,
    commands: &mut mpsc::Receiver<ClientCommand>,
    delay: Duration,
) -> Option<ReconnectAction> {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return driver.step(LifecycleEvent::RetryElapsed).await,
            command = commands.recv() => match command {
                Some(ClientCommand::Send(frame)) => {
                    tracing::warn!("[Client] Dropping {:?} while reconnecting", frame);
                }
                Some(ClientCommand::Connect) => {}
                Some(ClientCommand::Disconnect) => return driver.step(LifecycleEvent::Disconnect).await,
                None => return None,
            },
        }
    }
}

/// Idle or failed: wait for the application to ask for a connection
async fn wait_for_connect(
    driver: &mut Driver,
    commands: &mut mpsc::Receiver<ClientCommand>,
) -> Option<ReconnectAction> {
    loop {
        match commands.recv().await? {
            ClientCommand::Connect => return driver.step(LifecycleEvent::ConnectRequested).await,
            ClientCommand::Send(frame) => {
                tracing::warn!("[Client] Dropping {:?} while disconnected", frame);
            }
            ClientCommand::Disconnect => {
                driver.step(LifecycleEvent::Disconnect).await?;
            }
        }
    }
}
