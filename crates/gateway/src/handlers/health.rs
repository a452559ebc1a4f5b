//! Health check handlers

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub listings: usize,
}

/// Liveness check - always returns healthy if server is running
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: rentnest_common::VERSION.to_string(),
        service: state.config.observability.service_name.clone(),
        listings: state.catalog.listings(&rentnest_common::Session::anonymous()).len(),
    })
}
