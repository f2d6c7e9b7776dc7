//! Model Registry
//!
//! Loads each variant's artifact from `<models_dir>/modelo_<variant>_exoplanetas.json`
//! on first use and keeps the outcome for the life of the process.
//!
//! Each variant has its own `OnceCell`: concurrent first requests await a
//! single load, and the cell only ever holds a fully validated classifier or
//! the `Unavailable` sentinel (first write wins). A failed load is never
//! retried; only a restart does that.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::classifiers::{Classifier, ModelArtifact};
use crate::error::AnalysisError;
use crate::models::ModelVariant;
use crate::services::feature_vectorizer::SCHEMA_LEN;

/// Outcome of a model load
#[derive(Clone)]
pub enum ModelHandle {
    Loaded(Arc<dyn Classifier>),
    /// Artifact missing, corrupt or incompatible; callers use mock results
    Unavailable,
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelHandle::Loaded(model) => write!(f, "Loaded({})", model.model_type()),
            ModelHandle::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Per-variant cache state, reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    NotLoaded,
    Loaded,
    Unavailable,
}

/// Process-wide model cache, injected into the orchestrator
pub struct ModelRegistry {
    models_dir: PathBuf,
    tess: OnceCell<ModelHandle>,
    kepler: OnceCell<ModelHandle>,
}

impl ModelRegistry {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            tess: OnceCell::new(),
            kepler: OnceCell::new(),
        }
    }

    /// Pre-register a classifier for a variant, bypassing the artifact on disk
    pub fn with_classifier(mut self, variant: ModelVariant, model: Arc<dyn Classifier>) -> Self {
        *self.cell_mut(variant) = OnceCell::new_with(Some(ModelHandle::Loaded(model)));
        self
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Artifact location for a variant
    pub fn artifact_path(&self, variant: ModelVariant) -> PathBuf {
        self.models_dir.join(variant.artifact_file_name())
    }

    /// Loaded classifier or `Unavailable`; loads on first call per variant
    pub async fn get_model(&self, variant: ModelVariant) -> ModelHandle {
        self.cell(variant)
            .get_or_init(|| self.load(variant))
            .await
            .clone()
    }

    pub fn status(&self, variant: ModelVariant) -> ModelStatus {
        match self.cell(variant).get() {
            None => ModelStatus::NotLoaded,
            Some(ModelHandle::Loaded(_)) => ModelStatus::Loaded,
            Some(ModelHandle::Unavailable) => ModelStatus::Unavailable,
        }
    }

    /// Load every variant now instead of on first request
    pub async fn preload(&self) {
        for variant in ModelVariant::all() {
            self.get_model(*variant).await;
        }
    }

    fn cell(&self, variant: ModelVariant) -> &OnceCell<ModelHandle> {
        match variant {
            ModelVariant::Tess => &self.tess,
            ModelVariant::Kepler => &self.kepler,
        }
    }

    fn cell_mut(&mut self, variant: ModelVariant) -> &mut OnceCell<ModelHandle> {
        match variant {
            ModelVariant::Tess => &mut self.tess,
            ModelVariant::Kepler => &mut self.kepler,
        }
    }

    async fn load(&self, variant: ModelVariant) -> ModelHandle {
        let path = self.artifact_path(variant);

        match load_artifact(&path).await {
            Ok(model) => {
                info!(
                    variant = %variant,
                    model_type = model.model_type(),
                    n_features = model.n_features(),
                    "✓ Model loaded from {}",
                    path.display()
                );
                ModelHandle::Loaded(model)
            }
            Err(e) => {
                error!(variant = %variant, "Error loading model from {}: {}", path.display(), e);
                ModelHandle::Unavailable
            }
        }
    }
}

async fn load_artifact(path: &Path) -> Result<Arc<dyn Classifier>, AnalysisError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AnalysisError::ModelLoad(format!("Cannot read artifact: {}", e)))?;

    ModelArtifact::from_json(&content)?.into_classifier(SCHEMA_LEN)
}
