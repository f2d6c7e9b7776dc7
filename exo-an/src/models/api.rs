//! HTTP request/response bodies

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::analysis::{ClassificationResult, Observation};
use super::variant::ModelVariant;

/// POST /analyze-observation body
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeObservationRequest {
    pub observation: Observation,
    /// Accepted for forward compatibility, never applied to the model
    #[serde(default)]
    pub hyperparameters: Option<Map<String, Value>>,
    /// "tess" (default) or "kepler"
    #[serde(default)]
    pub model: Option<String>,
}

/// POST /analyze-dataset body
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeDatasetRequest {
    pub observations: Vec<Observation>,
    /// Accepted for forward compatibility, never applied to the model
    #[serde(default)]
    pub hyperparameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Successful single-observation response
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeObservationResponse {
    pub status: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
}

/// Per-class row counts for an analyzed batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub planets: usize,
    pub candidates: usize,
    pub ambiguous: usize,
    pub non_planets: usize,
}

/// Confidence statistics for an analyzed batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub average_confidence: f64,
    pub low_confidence_count: usize,
    pub high_confidence_count: usize,
    pub model_version: String,
    /// RFC 3339 UTC
    pub timestamp: String,
}

/// Successful dataset response
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeDatasetResponse {
    pub status: String,
    pub analyzed_data: Vec<Observation>,
    pub summary: DatasetSummary,
    pub model_metrics: ModelMetrics,
}

/// One entry of the static dataset catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub img: String,
    /// Model variant trained on this table
    pub model: ModelVariant,
}

/// GET /select-dataset/:id response
#[derive(Debug, Clone, Serialize)]
pub struct SelectDatasetResponse {
    pub status: String,
    pub dataset: String,
    pub model: ModelVariant,
    pub data: Vec<Observation>,
}
