//! Nearest-centroid classifier
//!
//! Predicts the class whose centroid is closest in Euclidean distance. It has
//! no notion of probability and no per-feature importances, so it declares
//! neither capability.

use serde::Deserialize;

use super::{check_features, validate_class_matrix, Capabilities, Classifier};
use crate::error::AnalysisError;

#[derive(Debug, Clone, Deserialize)]
pub struct CentroidSpec {
    /// NUM_CLASSES rows of n_features coordinates
    pub centroids: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct NearestCentroid {
    centroids: Vec<Vec<f64>>,
    n_features: usize,
    model_type: String,
}

impl NearestCentroid {
    pub fn from_spec(
        spec: CentroidSpec,
        n_features: usize,
        model_type: Option<String>,
    ) -> Result<Self, AnalysisError> {
        validate_class_matrix("centroids", &spec.centroids, n_features)?;
        Ok(Self {
            centroids: spec.centroids,
            n_features,
            model_type: model_type.unwrap_or_else(|| "NearestCentroid".to_string()),
        })
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl Classifier for NearestCentroid {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn predict(&self, features: &[f64]) -> Result<usize, AnalysisError> {
        check_features(features, self.n_features)?;

        let mut best: Option<(usize, f64)> = None;
        for (class, centroid) in self.centroids.iter().enumerate() {
            let d = squared_distance(features, centroid);
            if d.is_nan() {
                return Err(AnalysisError::Classifier(
                    "Distance to centroid is NaN".to_string(),
                ));
            }
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((class, d));
            }
        }

        best.map(|(class, _)| class)
            .ok_or_else(|| AnalysisError::Classifier("Model has no centroids".to_string()))
    }
}
