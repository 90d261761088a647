//! Client Module
//!
//! Reconnecting client for the chat socket, compiled with the `client`
//! feature.
//!
//! - **`reconnect`** - Pure reconnection state machine
//! - **`connection`** - Socket driver executing the state machine
//! - **`auth`** - Login and socket token helpers
//! - **`error`** - Client error type

pub mod auth;
pub mod connection;
pub mod error;
pub mod reconnect;

pub use auth::{websocket_url, AuthClient, AuthSession};
pub use connection::{ChatClient, ClientEvent};
pub use error::{ClientError, ClientResult};
pub use reconnect::{ConnectionState, LifecycleEvent, ReconnectAction, ReconnectController};
