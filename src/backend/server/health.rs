//! `GET /health`

use crate::backend::chat::ChatHub;
use axum::{extract::State, response::Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub connections: usize,
    pub rooms: usize,
}

/// Liveness plus live connection and room counts
pub async fn health(State(hub): State<ChatHub>) -> Json<HealthResponse> {
    let stats = hub.stats().await;
    Json(HealthResponse {
        status: "ok",
        connections: stats.connections,
        rooms: stats.rooms,
    })
}
