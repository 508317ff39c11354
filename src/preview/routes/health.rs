//! GET /health

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::preview::state::PreviewState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
}

pub async fn health(State(state): State<Arc<PreviewState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
