//! Health/ready HTTP surface.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub database: String,
}

pub struct HealthState {
    pub pool: PgPool,
    pub start_time: Instant,
}

pub async fn health(State(state): State<Arc<HealthState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

pub async fn ready(State(state): State<Arc<HealthState>>) -> Json<ReadyResponse> {
    let database = match names_storage::check_connection(&state.pool).await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    Json(ReadyResponse {
        status: if database == "connected" { "ok" } else { "degraded" }.to_string(),
        database: database.to_string(),
    })
}
