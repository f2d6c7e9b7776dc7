//! Error types for exo-an
//!
//! Two layers:
//! - [`AnalysisError`]: failures inside the analysis pipeline. None of these
//!   ever reach an HTTP client as a fault; the orchestrator converts each one
//!   into a mock or degraded classification result.
//! - [`ApiError`]: request-level failures (bad body, unknown model variant,
//!   unknown dataset) rendered as the `{status: "error", message}` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use exo_common::api::ErrorEnvelope;
use thiserror::Error;

/// Analysis pipeline errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Model artifact missing, corrupt, or incompatible with the feature schema
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    /// Observation value could not be coerced to a float
    #[error("could not convert value {value} of feature '{feature}' to float")]
    FeatureType { feature: String, value: String },

    /// Any failure while vectorizing or predicting a batch
    #[error("Batch processing failed: {0}")]
    BatchProcessing(String),

    /// The loaded classifier produced output outside its contract
    #[error("Classifier error: {0}")]
    Classifier(String),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// exo-common error
    #[error(transparent)]
    Common(#[from] exo_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Common(exo_common::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Common(exo_common::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, Json(ErrorEnvelope::new(self.to_string()))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
