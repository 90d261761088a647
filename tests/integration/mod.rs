//! Integration tests
//!
//! - `api` - REST endpoints through the router
//! - `realtime` - socket sessions against a live listener

pub mod realtime;
