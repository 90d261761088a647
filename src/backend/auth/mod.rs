//! Authentication Module
//!
//! This module handles user registration, login and credential verification.
//!
//! # Architecture
//!
//! - **`users`** - In-memory user store with bcrypt password hashes
//! - **`sessions`** - JWT issuing and the identity verifier used by the socket handshake
//! - **`cookies`** - `authToken` cookie helpers
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User store
//! ├── sessions.rs     - JWT token management and verification
//! ├── cookies.rs      - Session cookie helpers
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - JWT tokens are used for stateless authentication
//! - Invalid credentials return 401 (no information leakage)

/// In-memory user store
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// Session cookie helpers
pub mod cookies;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{get_me, login, logout, register, websocket_token};
pub use sessions::{Claims, TokenKeys, UserIdentity};
pub use users::{User, UserError, UserStore};
