//! Gamechat - Main Library
//!
//! Real-time chat for game rooms. Authenticated users create and join named
//! games and exchange messages over WebSocket connections; the browser and
//! native clients reconnect on their own after server restarts or network
//! blips.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and client
//!   - Room and connection ids, socket frames, chat messages
//!   - Error taxonomy and client configuration
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and socket endpoint
//!   - Connection registry, room directory and broadcast
//!   - Auth and games REST endpoints
//!
//! - **`client`** - Reconnecting client (only compiled with `client` feature)
//!   - Reconnection state machine
//!   - tokio-tungstenite connection driver
//!   - REST login helper
//!
//! # Feature Flags
//!
//! - **`ssr`** - Server (axum, bcrypt, jsonwebtoken, tower-http)
//! - **`client`** - Client (tokio-tungstenite, reqwest)
//!
//! Both are enabled by default.
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use gamechat::backend::server::{config::ServerConfig, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()?).await?;
//! axum::serve(listener, create_app(config)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client
//!
//! ```rust,no_run
//! use gamechat::client::{ChatClient, ClientEvent};
//! use gamechat::shared::ClientConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::builder()
//!     .websocket_url("ws://127.0.0.1:3000/websocket?token=...")
//!     .build()?;
//! let (client, mut events) = ChatClient::spawn(config);
//! client.send_message("hello").await?;
//! while let Some(event) = events.recv().await {
//!     if let ClientEvent::GaveUp { .. } = event {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::ChatError` for chat core failures (also sent as error frames)
//! - `backend::BackendError` for HTTP handlers
//! - `client::ClientError` for the client

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Reconnecting client
#[cfg(feature = "client")]
pub mod client;
