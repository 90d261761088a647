//! Socket integration tests
//!
//! Each test spawns a server on an ephemeral port and talks to it with
//! tokio-tungstenite or the crate's own client.

mod websocket_test;
