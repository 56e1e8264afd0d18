//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend_url: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend_url: state.api.base_url().to_string(),
    })
}

/// Root endpoint
pub async fn root() -> &'static str {
    "Paddy Reception Platform API v0.1"
}

/// Unknown paths under a gated router
pub async fn not_found() -> AppError {
    AppError::NotFound("la ruta solicitada".to_string())
}
