//! Business logic services for exo-an

pub mod analysis_orchestrator;
pub mod batch_summary;
pub mod classifier_adapter;
pub mod dataset_catalog;
pub mod explainer;
pub mod feature_vectorizer;
pub mod model_registry;

pub use analysis_orchestrator::AnalysisOrchestrator;
pub use dataset_catalog::DatasetStore;
pub use model_registry::{ModelHandle, ModelRegistry, ModelStatus};
