//! Dataset catalog API
//!
//! GET /datasets lists the static catalog; GET /select-dataset/:id returns a
//! catalog table's rows as JSON objects keyed by CSV header.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use exo_common::api::STATUS_SUCCESS;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{DatasetEntry, SelectDatasetResponse},
    services::dataset_catalog,
    AppState,
};

/// GET /datasets
pub async fn list_datasets() -> Json<Vec<DatasetEntry>> {
    Json(dataset_catalog::catalog())
}

/// GET /select-dataset/:id
///
/// Unknown id → 404, unreadable table → 500.
pub async fn select_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SelectDatasetResponse>> {
    let entry = dataset_catalog::find(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Dataset '{}'", id)))?;

    let data = state.datasets.load_rows(&entry.id).await?;
    info!(dataset = %entry.id, rows = data.len(), "Dataset loaded");

    Ok(Json(SelectDatasetResponse {
        status: STATUS_SUCCESS.to_string(),
        dataset: entry.id,
        model: entry.model,
        data,
    }))
}

/// Build dataset routes
pub fn dataset_routes() -> Router<AppState> {
    Router::new()
        .route("/datasets", get(list_datasets))
        .route("/select-dataset/:id", get(select_dataset))
}
