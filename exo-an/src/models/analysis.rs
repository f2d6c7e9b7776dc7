//! Analysis data types
//!
//! Observations are loosely typed JSON objects; everything derived from them
//! (feature vectors, classification results) is strongly typed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One transit measurement record: feature name → value (possibly null/empty)
pub type Observation = Map<String, Value>;

/// Fixed-length feature vector in the variant's canonical schema order
pub type FeatureVector = Vec<f64>;

/// Number of classification classes
pub const NUM_CLASSES: usize = 4;

/// Classification classes: 0 = non-planet, 1 = ambiguous, 2 = candidate, 3 = confirmed
pub const CLASS_NON_PLANET: u8 = 0;
pub const CLASS_AMBIGUOUS: u8 = 1;
pub const CLASS_CANDIDATE: u8 = 2;
pub const CLASS_CONFIRMED: u8 = 3;

/// Human-readable class label used in explanations
pub fn class_label(classification: u8) -> &'static str {
    match classification {
        CLASS_NON_PLANET => "non-planet",
        CLASS_AMBIGUOUS => "ambiguous object",
        CLASS_CANDIDATE => "planet candidate",
        CLASS_CONFIRMED => "confirmed planet",
        _ => "unknown",
    }
}

/// Contribution weight of one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub importance: f64,
}

impl FeatureImportance {
    pub fn new(name: impl Into<String>, importance: f64) -> Self {
        Self {
            name: name.into(),
            importance,
        }
    }
}

/// Result of analyzing a single observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Class id in 0..=3
    pub classification: u8,
    /// Probability of the predicted class (0.0-1.0)
    pub confidence: f64,
    /// Per-class probabilities, length 4
    pub probabilities: Vec<f64>,
    /// Sorted descending by importance
    pub feature_importance: Vec<FeatureImportance>,
    pub explanation: String,
    pub details: Map<String, Value>,
}
