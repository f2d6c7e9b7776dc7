//! Root banner and health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use exo_common::api::MessageResponse;
use serde::Serialize;

use crate::models::ModelVariant;
use crate::services::ModelStatus;
use crate::AppState;

/// Per-variant model cache state
#[derive(Debug, Serialize)]
pub struct ModelsHealth {
    pub tess: ModelStatus,
    pub kepler: ModelStatus,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("exo-an")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    pub models: ModelsHealth,
}

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Exoplanet API is running!".to_string(),
    })
}

/// GET /health
///
/// Reports uptime and whether each model has been loaded. Does not trigger a
/// model load.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;
    let registry = state.orchestrator.registry();

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "exo-an".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        models: ModelsHealth {
            tess: registry.status(ModelVariant::Tess),
            kepler: registry.status(ModelVariant::Kepler),
        },
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
