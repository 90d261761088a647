//! Games Module
//!
//! REST endpoints for listing, creating and joining games (chat rooms).
//!
//! ```text
//! games/
//! ├── mod.rs       - Module exports
//! ├── types.rs     - Request and response bodies
//! └── handlers.rs  - GET/POST /games, POST /games/join
//! ```

/// Request and response bodies
pub mod types;

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_game, join_game, list_games};
