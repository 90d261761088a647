//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - In-process servers on an ephemeral port
//! - Authentication test helpers
//! - Socket helpers
//! - Custom assertion macros

#[macro_use]
pub mod assertions;
pub mod auth_helpers;
pub mod server;
pub mod socket;

// Re-export commonly used utilities
pub use auth_helpers::*;
pub use server::*;
pub use socket::*;
