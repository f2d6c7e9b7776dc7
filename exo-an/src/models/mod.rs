//! Data models for exo-an (Analysis service)

pub mod analysis;
pub mod api;
pub mod variant;

pub use analysis::{
    class_label, ClassificationResult, FeatureImportance, FeatureVector, Observation, NUM_CLASSES,
};
pub use api::{
    AnalyzeDatasetRequest, AnalyzeDatasetResponse, AnalyzeObservationRequest,
    AnalyzeObservationResponse, DatasetEntry, DatasetSummary, ModelMetrics, SelectDatasetResponse,
};
pub use variant::ModelVariant;
