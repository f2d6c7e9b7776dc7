//! Multinomial logistic regression
//!
//! Decision function per class: `z_k = coef[k] · x + intercept[k]`.
//! Probabilities are the softmax of `z`.

use serde::Deserialize;

use super::{argmax, check_features, validate_class_matrix, Capabilities, Classifier};
use crate::error::AnalysisError;
use crate::models::NUM_CLASSES;

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticSpec {
    /// NUM_CLASSES rows of n_features weights
    pub coef: Vec<Vec<f64>>,
    /// One bias per class
    pub intercept: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    n_features: usize,
    model_type: String,
}

impl LogisticRegression {
    pub fn from_spec(
        spec: LogisticSpec,
        n_features: usize,
        model_type: Option<String>,
    ) -> Result<Self, AnalysisError> {
        validate_class_matrix("coef", &spec.coef, n_features)?;
        if spec.intercept.len() != NUM_CLASSES || spec.intercept.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::ModelLoad(format!(
                "intercept must hold {} finite values",
                NUM_CLASSES
            )));
        }

        Ok(Self {
            coef: spec.coef,
            intercept: spec.intercept,
            n_features,
            model_type: model_type.unwrap_or_else(|| "LogisticRegression".to_string()),
        })
    }

    fn decision_function(&self, features: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(weights, bias)| {
                weights.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + bias
            })
            .collect()
    }
}

/// Numerically stable softmax
fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = z.iter().map(|v| (v - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}

impl Classifier for LogisticRegression {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            probabilities: true,
            importances: false,
        }
    }

    fn predict(&self, features: &[f64]) -> Result<usize, AnalysisError> {
        check_features(features, self.n_features)?;
        let z = self.decision_function(features);
        if z.iter().any(|v| v.is_nan()) {
            return Err(AnalysisError::Classifier(
                "Decision function produced NaN".to_string(),
            ));
        }
        Ok(argmax(&z))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        check_features(features, self.n_features)?;
        let probabilities = softmax(&self.decision_function(features));
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(AnalysisError::Classifier(
                "Softmax produced non-finite probabilities".to_string(),
            ));
        }
        Ok(probabilities)
    }
}
