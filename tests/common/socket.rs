//! Raw socket helpers built on tokio-tungstenite

use futures_util::{SinkExt, StreamExt};
use gamechat::shared::ServerEvent;
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for an expected frame
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a socket must stay quiet to count as silent
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

pub async fn connect(url: &str) -> WsStream {
    let (stream, _response) = connect_async(url).await.expect("WebSocket connect failed");
    stream
}

pub async fn send_json(ws: &mut WsStream, frame: Value) {
    ws.send(Message::text(frame.to_string()))
        .await
        .expect("Failed to send frame");
}

/// Next server event, skipping control frames
pub async fn next_event(ws: &mut WsStream) -> ServerEvent {
    let deadline = tokio::time::Instant::now() + FRAME_TIMEOUT;
    loop {
        let message = tokio::time::timeout_at(deadline, ws.next())
            .await
            .expect("Timed out waiting for a server event")
            .expect("Socket ended while waiting for a server event")
            .expect("Socket error while waiting for a server event");
        match message {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Server sent an unreadable event");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Expected a text frame, got {:?}", other),
        }
    }
}

/// Assert nothing but control frames arrives for a short while
pub async fn expect_silence(ws: &mut WsStream) {
    let deadline = tokio::time::Instant::now() + QUIET_PERIOD;
    loop {
        match tokio::time::timeout_at(deadline, ws.next()).await {
            Err(_) => return,
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
            Ok(other) => panic!("Expected silence, got {:?}", other),
        }
    }
}

/// Wait for the server's close frame and return its code
pub async fn expect_close(ws: &mut WsStream) -> u16 {
    let deadline = tokio::time::Instant::now() + FRAME_TIMEOUT;
    loop {
        let message = tokio::time::timeout_at(deadline, ws.next())
            .await
            .expect("Timed out waiting for close");
        match message {
            Some(Ok(Message::Close(Some(frame)))) => return u16::from(frame.code),
            Some(Ok(Message::Close(None))) | None | Some(Err(_)) => {
                panic!("Connection ended without a close code")
            }
            Some(Ok(_)) => continue,
        }
    }
}
