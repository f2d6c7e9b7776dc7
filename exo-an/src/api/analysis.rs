//! Analysis API handlers
//!
//! POST /analyze-observation and POST /analyze-dataset. Analysis itself never
//! fails; only an unreadable body or an unknown model variant produces an
//! error envelope.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use exo_common::api::STATUS_SUCCESS;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        AnalyzeDatasetRequest, AnalyzeDatasetResponse, AnalyzeObservationRequest,
        AnalyzeObservationResponse, ModelVariant,
    },
    services::batch_summary,
    AppState,
};

/// POST /analyze-observation
///
/// Classify one observation with the requested model variant.
pub async fn analyze_observation(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeObservationRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeObservationResponse>> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let variant = parse_variant(request.model.as_deref())?;
    log_hyperparameters(request.hyperparameters.as_ref());

    let result = state
        .orchestrator
        .analyze_observation(&request.observation, variant)
        .await;

    Ok(Json(AnalyzeObservationResponse {
        status: STATUS_SUCCESS.to_string(),
        result,
    }))
}

/// POST /analyze-dataset
///
/// Classify a batch of observations and summarize the outcome.
pub async fn analyze_dataset(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeDatasetRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeDatasetResponse>> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let variant = parse_variant(request.model.as_deref())?;
    log_hyperparameters(request.hyperparameters.as_ref());

    info!(
        variant = %variant,
        rows = request.observations.len(),
        "Dataset analysis request"
    );

    let analyzed_data = state
        .orchestrator
        .analyze_dataset(request.observations, variant)
        .await;
    let summary = batch_summary::summarize(&analyzed_data);
    let model_metrics = batch_summary::model_metrics(&analyzed_data, Utc::now());

    Ok(Json(AnalyzeDatasetResponse {
        status: STATUS_SUCCESS.to_string(),
        analyzed_data,
        summary,
        model_metrics,
    }))
}

/// Requested variant, "tess" when absent
fn parse_variant(model: Option<&str>) -> ApiResult<ModelVariant> {
    match model {
        None => Ok(ModelVariant::default()),
        Some(name) => Ok(name.parse::<ModelVariant>()?),
    }
}

/// Hyperparameters are accepted but not applied to the model
fn log_hyperparameters(hyperparameters: Option<&Map<String, Value>>) {
    if let Some(params) = hyperparameters.filter(|p| !p.is_empty()) {
        debug!(?params, "Ignoring hyperparameters (not applied to trained models)");
    }
}

/// Build analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-observation", post(analyze_observation))
        .route("/analyze-dataset", post(analyze_dataset))
}
