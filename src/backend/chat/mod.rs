//! Chat Backend Module
//!
//! This module contains the server-side chat core:
//! - The registry of live connections
//! - Rooms ("games") with their member sets and message history
//! - The room directory and its race-free membership changes
//! - The hub that ties them together for sessions and REST handlers
//!
//! All state is in memory and lives for the lifetime of the process.
//!
//! # Module Structure
//!
//! ```text
//! chat/
//! ├── mod.rs        - Module exports and documentation
//! ├── registry.rs   - Connection registry (owns connections)
//! ├── room.rs       - Room and message history
//! ├── directory.rs  - Room directory, join/leave/remove
//! └── hub.rs        - Facade used by sessions and REST handlers
//! ```
//!
//! # Ownership
//!
//! The registry owns `ConnectionId → Connection`. Rooms hold ids only and
//! resolve them through the registry when delivering, so a removed
//! connection drops out of every later snapshot on its own.
//!
//! # Example
//!
//! ```rust,no_run
//! use gamechat::backend::chat::ChatHub;
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), gamechat::shared::ChatError> {
//! let hub = ChatHub::new(100, 2000);
//! let room = hub.create_room(Some("Trivia Night"), Uuid::new_v4()).await?;
//! assert_eq!(hub.list_rooms().await[0].game_id, room.id);
//! # Ok(())
//! # }
//! ```

/// Connection registry
pub mod registry;

/// Rooms and message history
pub mod room;

/// Room directory
pub mod directory;

/// Chat hub
pub mod hub;

/// Re-export commonly used types
pub use directory::{JoinOutcome, LeaveOutcome, RoomDirectory};
pub use hub::{ChatHub, HubStats};
pub use registry::{Connection, ConnectionEntry, ConnectionRegistry, OutboundFrame, OutboundSender};
pub use room::{MessageHistory, Room, RoomSummary};
