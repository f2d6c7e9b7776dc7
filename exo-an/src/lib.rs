//! exo-an library
//!
//! Exoplanet transit analysis service: classifies astronomical transit
//! observations into non-planet / ambiguous / candidate / confirmed planet
//! with trained models loaded from disk, and serves the pre-cleaned dataset
//! tables those models were built from.
//!
//! Exposed as a library so integration tests can build the router directly.

pub mod api;
pub mod classifiers;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use exo_common::config::ServiceConfig;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{AnalysisOrchestrator, DatasetStore, ModelRegistry};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub datasets: Arc<DatasetStore>,
    /// Service startup timestamp for uptime calculation
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> Self {
        let registry = Arc::new(ModelRegistry::new(&config.models_dir));
        let orchestrator = AnalysisOrchestrator::new(registry, config.mock_seed);
        Self::from_parts(orchestrator, DatasetStore::new(&config.datasets_dir))
    }

    pub fn from_parts(orchestrator: AnalysisOrchestrator, datasets: DatasetStore) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            datasets: Arc::new(datasets),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::buildinfo_routes())
        .merge(api::analysis_routes())
        .merge(api::dataset_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
