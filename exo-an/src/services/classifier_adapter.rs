//! Classifier Adapter
//!
//! Turns a loaded [`Classifier`] into `(classification, confidence,
//! probabilities)`. When the model declares probability support, confidence
//! is the probability of the predicted class. Otherwise probabilities are
//! synthesized as one-hot with [`SYNTHETIC_CONFIDENCE`] mass on the predicted
//! class; that confidence is a fixed approximation, not an estimate.

use crate::classifiers::Classifier;
use crate::error::AnalysisError;
use crate::models::{FeatureVector, NUM_CLASSES};

/// Confidence reported for models without probability support
pub const SYNTHETIC_CONFIDENCE: f64 = 0.85;

/// Tolerance for probability vectors that should sum to one
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Adapter output for one feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub classification: u8,
    pub confidence: f64,
    /// Length NUM_CLASSES
    pub probabilities: Vec<f64>,
}

/// Classify one feature vector
pub fn classify(vector: &[f64], model: &dyn Classifier) -> Result<Prediction, AnalysisError> {
    let classification = checked_class(model.predict(vector)?)?;

    if !model.capabilities().probabilities {
        return Ok(Prediction {
            classification,
            confidence: SYNTHETIC_CONFIDENCE,
            probabilities: synthetic_probabilities(classification),
        });
    }

    let probabilities = checked_probabilities(model.predict_proba(vector)?)?;
    Ok(Prediction {
        classification,
        confidence: probabilities[classification as usize],
        probabilities,
    })
}

/// Classify a batch, returning `(classification, confidence)` per row
pub fn classify_batch(
    rows: &[FeatureVector],
    model: &dyn Classifier,
) -> Result<Vec<(u8, f64)>, AnalysisError> {
    let classes = model
        .predict_batch(rows)?
        .into_iter()
        .map(checked_class)
        .collect::<Result<Vec<_>, _>>()?;

    if classes.len() != rows.len() {
        return Err(AnalysisError::Classifier(format!(
            "Model returned {} predictions for {} rows",
            classes.len(),
            rows.len()
        )));
    }

    if !model.capabilities().probabilities {
        return Ok(classes
            .into_iter()
            .map(|class| (class, SYNTHETIC_CONFIDENCE))
            .collect());
    }

    let probabilities = model.predict_proba_batch(rows)?;
    if probabilities.len() != rows.len() {
        return Err(AnalysisError::Classifier(format!(
            "Model returned {} probability rows for {} rows",
            probabilities.len(),
            rows.len()
        )));
    }

    classes
        .into_iter()
        .zip(probabilities)
        .map(|(class, probs)| {
            let probs = checked_probabilities(probs)?;
            Ok((class, probs[class as usize]))
        })
        .collect()
}

/// One-hot vector with SYNTHETIC_CONFIDENCE on the predicted class
pub fn synthetic_probabilities(classification: u8) -> Vec<f64> {
    let mut probabilities = vec![0.0; NUM_CLASSES];
    probabilities[classification as usize] = SYNTHETIC_CONFIDENCE;
    probabilities
}

fn checked_class(class: usize) -> Result<u8, AnalysisError> {
    if class >= NUM_CLASSES {
        return Err(AnalysisError::Classifier(format!(
            "Predicted class {} outside 0..{}",
            class, NUM_CLASSES
        )));
    }
    Ok(class as u8)
}

fn checked_probabilities(probabilities: Vec<f64>) -> Result<Vec<f64>, AnalysisError> {
    if probabilities.len() != NUM_CLASSES {
        return Err(AnalysisError::Classifier(format!(
            "Model returned {} class probabilities, expected {}",
            probabilities.len(),
            NUM_CLASSES
        )));
    }
    let total: f64 = probabilities.iter().sum();
    if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0)
        || (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE
    {
        return Err(AnalysisError::Classifier(format!(
            "Model returned an invalid probability vector {:?}",
            probabilities
        )));
    }
    Ok(probabilities)
}
