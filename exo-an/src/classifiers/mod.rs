//! Trained classifier artifacts
//!
//! The service never trains anything: a classifier is an opaque oracle loaded
//! from a JSON artifact. Every artifact declares up front what it can do
//! beyond `predict` through [`Capabilities`], so callers branch on declared
//! flags instead of probing the model.
//!
//! Artifact layout:
//!
//! ```json
//! {
//!   "model_type": "RandomForestClassifier",
//!   "n_features": 24,
//!   "estimator": { "kind": "random_forest", "trees": [ ... ] }
//! }
//! ```

pub mod centroid;
pub mod linear;
pub mod tree;

use serde::Deserialize;
use std::sync::Arc;

use crate::error::AnalysisError;
use crate::models::{FeatureVector, NUM_CLASSES};

pub use centroid::{CentroidSpec, NearestCentroid};
pub use linear::{LogisticRegression, LogisticSpec};
pub use tree::{DecisionTree, ForestSpec, RandomForest, TreeSpec};

/// Optional abilities a classifier declares beyond `predict`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// `predict_proba` returns real per-class probabilities
    pub probabilities: bool,
    /// `feature_importances` returns one weight per schema feature
    pub importances: bool,
}

/// Uniform interface over every loaded model
pub trait Classifier: Send + Sync {
    /// Estimator name reported in analysis details
    fn model_type(&self) -> &str;

    /// Expected feature vector length
    fn n_features(&self) -> usize;

    fn capabilities(&self) -> Capabilities;

    /// Predict the class id (0..4) of one feature vector
    fn predict(&self, features: &[f64]) -> Result<usize, AnalysisError>;

    /// Per-class probabilities; only meaningful when `capabilities().probabilities`
    fn predict_proba(&self, _features: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        Err(AnalysisError::Classifier(format!(
            "{} does not provide class probabilities",
            self.model_type()
        )))
    }

    /// Native per-feature importances; only meaningful when `capabilities().importances`
    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }

    fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<usize>, AnalysisError> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    fn predict_proba_batch(&self, rows: &[FeatureVector]) -> Result<Vec<Vec<f64>>, AnalysisError> {
        rows.iter().map(|row| self.predict_proba(row)).collect()
    }
}

/// Estimator payload, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    DecisionTree(TreeSpec),
    RandomForest(ForestSpec),
    LogisticRegression(LogisticSpec),
    NearestCentroid(CentroidSpec),
}

/// Parsed (not yet validated) artifact document
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub model_type: Option<String>,
    pub n_features: usize,
    pub estimator: EstimatorSpec,
}

impl ModelArtifact {
    pub fn from_json(content: &str) -> Result<Self, AnalysisError> {
        serde_json::from_str(content)
            .map_err(|e| AnalysisError::ModelLoad(format!("Corrupt model artifact: {}", e)))
    }

    /// Validate against the variant's schema length and build the classifier
    pub fn into_classifier(
        self,
        expected_features: usize,
    ) -> Result<Arc<dyn Classifier>, AnalysisError> {
        if self.n_features != expected_features {
            return Err(AnalysisError::ModelLoad(format!(
                "Artifact expects {} features, schema has {}",
                self.n_features, expected_features
            )));
        }

        let n = self.n_features;
        let name = self.model_type;
        let classifier: Arc<dyn Classifier> = match self.estimator {
            EstimatorSpec::DecisionTree(spec) => Arc::new(DecisionTree::from_spec(spec, n, name)?),
            EstimatorSpec::RandomForest(spec) => Arc::new(RandomForest::from_spec(spec, n, name)?),
            EstimatorSpec::LogisticRegression(spec) => {
                Arc::new(LogisticRegression::from_spec(spec, n, name)?)
            }
            EstimatorSpec::NearestCentroid(spec) => {
                Arc::new(NearestCentroid::from_spec(spec, n, name)?)
            }
        };
        Ok(classifier)
    }
}

/// Reject vectors of the wrong length or with NaN/infinite values before
/// touching model parameters
pub(crate) fn check_features(features: &[f64], expected: usize) -> Result<(), AnalysisError> {
    if features.len() != expected {
        return Err(AnalysisError::Classifier(format!(
            "Feature vector has {} entries, model expects {}",
            features.len(),
            expected
        )));
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(AnalysisError::Classifier(format!(
            "Feature {} is not finite ({})",
            index, features[index]
        )));
    }
    Ok(())
}

/// Index of the largest value; the lowest index wins ties
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Validate optional native importances (length and sign)
pub(crate) fn validate_importances(
    importances: Option<Vec<f64>>,
    n_features: usize,
) -> Result<Option<Vec<f64>>, AnalysisError> {
    let Some(importances) = importances else {
        return Ok(None);
    };
    if importances.len() != n_features {
        return Err(AnalysisError::ModelLoad(format!(
            "feature_importances has {} entries, expected {}",
            importances.len(),
            n_features
        )));
    }
    if importances.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(AnalysisError::ModelLoad(
            "feature_importances must be finite and non-negative".to_string(),
        ));
    }
    Ok(Some(importances))
}

/// Validate a `NUM_CLASSES × n_features` parameter matrix
pub(crate) fn validate_class_matrix(
    name: &str,
    matrix: &[Vec<f64>],
    n_features: usize,
) -> Result<(), AnalysisError> {
    if matrix.len() != NUM_CLASSES {
        return Err(AnalysisError::ModelLoad(format!(
            "{} has {} rows, expected {}",
            name,
            matrix.len(),
            NUM_CLASSES
        )));
    }
    if let Some(row) = matrix.iter().find(|row| row.len() != n_features) {
        return Err(AnalysisError::ModelLoad(format!(
            "{} row has {} columns, expected {}",
            name,
            row.len(),
            n_features
        )));
    }
    if matrix.iter().flatten().any(|v| !v.is_finite()) {
        return Err(AnalysisError::ModelLoad(format!("{} contains non-finite values", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_lowest_index_on_tie() {
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), 1);
        assert_eq!(argmax(&[0.0, 0.0, 0.0, 1.0]), 3);
    }

    #[test]
    fn test_artifact_rejects_wrong_feature_count() {
        let artifact = ModelArtifact::from_json(
            r#"{"n_features": 3, "estimator": {"kind": "nearest_centroid",
                "centroids": [[0,0,0],[1,1,1],[2,2,2],[3,3,3]]}}"#,
        )
        .unwrap();

        let err = artifact.into_classifier(24).err().unwrap();
        assert!(matches!(err, AnalysisError::ModelLoad(_)));
    }

    #[test]
    fn test_artifact_rejects_unknown_kind() {
        let err = ModelArtifact::from_json(r#"{"n_features": 24, "estimator": {"kind": "svm"}}"#)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Corrupt model artifact"));
    }

    #[test]
    fn test_every_estimator_rejects_non_finite_features() {
        let stump = serde_json::json!({
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [0, -2, -2],
            "threshold": [1.0, -2.0, -2.0],
            "value": [[1, 1, 1, 1], [1, 0, 0, 0], [0, 0, 0, 1]]
        });
        let estimators = [
            serde_json::json!({"kind": "decision_tree", "children_left": stump["children_left"],
                "children_right": stump["children_right"], "feature": stump["feature"],
                "threshold": stump["threshold"], "value": stump["value"]}),
            serde_json::json!({"kind": "random_forest", "trees": [stump.clone()]}),
            serde_json::json!({"kind": "logistic_regression",
                "coef": [[1, 0], [0, 1], [-1, 0], [0, -1]], "intercept": [0, 0, 0, 0]}),
            serde_json::json!({"kind": "nearest_centroid",
                "centroids": [[0, 0], [1, 1], [2, 2], [3, 3]]}),
        ];

        for estimator in estimators {
            let kind = estimator["kind"].clone();
            let model = ModelArtifact::from_json(
                &serde_json::json!({"n_features": 2, "estimator": estimator}).to_string(),
            )
            .unwrap()
            .into_classifier(2)
            .unwrap();

            assert!(model.predict(&[0.5, 0.5]).is_ok(), "{}", kind);
            for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                assert!(
                    matches!(model.predict(&[bad, 0.5]), Err(AnalysisError::Classifier(_))),
                    "{} accepted {}",
                    kind,
                    bad
                );
                if model.capabilities().probabilities {
                    assert!(model.predict_proba(&[0.5, bad]).is_err(), "{}", kind);
                }
            }
        }
    }

    #[test]
    fn test_importances_must_match_schema() {
        assert!(validate_importances(Some(vec![0.5, 0.5]), 3).is_err());
        assert!(validate_importances(Some(vec![0.5, -0.1, 0.6]), 3).is_err());
        assert_eq!(validate_importances(None, 3).unwrap(), None);
    }
}
