//! Server Module
//!
//! This module contains all server-side code for initializing and configuring
//! the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`config`** - Layered configuration loading and validation
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`init`** - Server initialization and app creation
//! - **`health`** - Health endpoint
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - ServerConfig (defaults, TOML, env)
//! ├── state.rs        - AppState and FromRef implementations
//! ├── init.rs         - Server initialization and app creation
//! └── health.rs       - GET /health
//! ```
//!
//! # Example
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

/// Server configuration loading
pub mod config;

/// Application state management
pub mod state;

/// Server initialization
pub mod init;

/// Health endpoint
pub mod health;

// Re-export commonly used types
pub use config::ServerConfig;
pub use init::{create_app, create_app_with_state};
pub use state::AppState;
