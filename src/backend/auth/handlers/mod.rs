//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - User registration handler
//! ├── login.rs     - User authentication handler
//! └── me.rs        - Current user, socket token and logout handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email + password → user created
//! 2. **Login**: credentials verified → token set as `authToken` cookie
//! 3. **Socket**: token read from the cookie, or fetched from
//!    `/auth/websocket-token` and passed as `?token=`

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Current user, socket token and logout handlers
pub mod me;

pub use types::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse, WebSocketTokenResponse};

pub use login::login;
pub use me::{get_me, logout, websocket_token};
pub use register::register;
