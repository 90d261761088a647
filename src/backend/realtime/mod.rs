//! Real-time Module
//!
//! The socket side of the chat: the upgrade endpoint, the per-connection
//! session state machine and the fan-out primitive used by the hub.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── broadcast.rs  - Encode-once fan-out and delivery reports
//! ├── session.rs    - Session protocol handler (state machine)
//! └── socket.rs     - Upgrade handler and connection worker
//! ```
//!
//! # Frames
//!
//! Every frame is a JSON object `{type, ...payload}`:
//!
//! - `getMessages` → `getMessagesResponse {messages:[{screenName, message}]}`
//! - `sendMessage {message}` → `messageReceivedNotification {screenName, message}`
//!   to every room member, the sender included
//! - `joinGame {gameId}` → `joinGameResponse {gameId, name}`
//! - `leaveGame`, `getPlayers`, `setScreenName {screenName}`
//! - `playerJoinedChatNotification` / `playerLeftChatNotification` on
//!   membership changes
//!
//! Unknown `type` values are logged and ignored.

/// Fan-out and delivery reports
pub mod broadcast;

/// Session protocol handler
pub mod session;

/// Socket upgrade and connection worker
pub mod socket;

pub use broadcast::{DeliveryFailure, DeliveryReport};
pub use session::{Session, SessionState};
pub use socket::{handle_socket_upgrade, SocketSettings};
