//! Shared Module
//!
//! This module contains types that are shared between the server and the
//! reconnecting client: identifiers, socket frames, chat messages, errors and
//! configuration. All wire types serialize to the JSON shapes the browser
//! client already speaks.

/// Room and connection identifiers
pub mod ids;

/// Chat message data structure
pub mod message;

/// Socket frames (client → server and server → client)
pub mod event;

/// Shared error types
pub mod error;

/// Client configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use error::{ChatError, ErrorCode};
pub use event::{ClientFrame, ServerEvent, VisibleMessage};
pub use ids::{ConnectionId, RoomId};
pub use message::ChatMessage;
