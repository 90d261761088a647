//! Middleware Module
//!
//! This module contains the HTTP middleware for the backend server.
//!
//! # Architecture
//!
//! - **`auth`** - Authentication middleware for protecting routes
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use gamechat::backend::middleware::auth_middleware;
//! use gamechat::backend::server::state::AppState;
//!
//! fn protect(router: Router<AppState>, state: &AppState) -> Router<AppState> {
//!     router.route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{auth_middleware, request_credential, AuthUser};
