//! Backend Module
//!
//! This module contains all server-side code: the Axum HTTP server, the
//! socket endpoint and the in-memory chat core behind both.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly
//! - **`chat`** - Connection registry, rooms, room directory, hub
//! - **`realtime`** - Socket upgrade, session state machine, fan-out
//! - **`games`** - REST endpoints for rooms
//! - **`auth`** - Users, tokens, cookies, auth endpoints
//! - **`middleware`** - Request authentication
//! - **`error`** - Backend error type and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Config, state, init, health
//! ├── routes/         - Route configuration
//! ├── chat/           - Chat core
//! ├── realtime/       - Socket side
//! ├── games/          - Games REST
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the `ChatHub`, the token keys and the user store. REST
//! handlers and socket workers share the same hub, so REST changes are seen
//! by live connections at once.
//!
//! # Concurrency
//!
//! One worker task per connection. Shared state is partitioned by room: each
//! room has its own locks, the registry has one `RwLock`, and there is no
//! lock spanning all rooms.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Chat core
pub mod chat;

/// Socket endpoint and session protocol
pub mod realtime;

/// Games REST endpoints
pub mod games;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Re-export commonly used types
pub use chat::ChatHub;
pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
