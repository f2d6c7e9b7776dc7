//! Explainer
//!
//! Ranks feature contributions and renders a short natural-language
//! rationale for a classification.
//!
//! Importance sources, in order of preference:
//! 1. Native importances declared by the model, mapped onto the variant's
//!    display names by schema position.
//! 2. A fixed-seed pseudo-random distribution. This is a placeholder so the
//!    UI has something to show; it carries no statistical meaning.
//! 3. Uniform weights, when declared native importances are unusable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::classifiers::Classifier;
use crate::models::{class_label, FeatureImportance, ModelVariant};
use crate::services::feature_vectorizer::SCHEMA_LEN;

/// Seed for placeholder importances; keeps explanations reproducible
pub const IMPORTANCE_SEED: u64 = 42;

/// Number of features named in an explanation
const EXPLAINED_FEATURES: usize = 3;

/// Human-readable names, same ordinal position as the TESS schema
pub const TESS_DISPLAY_NAMES: [&str; SCHEMA_LEN] = [
    "Planet Radius Error Upper",
    "Star Radius",
    "Orbital Period",
    "Star Distance",
    "Star Distance Error Lower",
    "Transit Depth",
    "Planet Radius",
    "Star Angular Motion",
    "Orbit Period Error Lower",
    "Transit Midpoint Uncertainty",
    "Transit Midpoint Time",
    "Equilibrium Temp",
    "Star Brightness",
    "Transit Depth Error Upper",
    "Transit Depth Error Lower",
    "Orbit Period Error Upper",
    "Surface Gravity",
    "Stellar Irradiance",
    "Temp Error Lower",
    "Effective Star Temp",
    "Star Distance Error Upper",
    "Transit Duration",
    "Transit Duration Error",
    "Transit Midpoint Error Upper",
];

/// Human-readable names, same ordinal position as the Kepler schema
pub const KEPLER_DISPLAY_NAMES: [&str; SCHEMA_LEN] = [
    "Row ID",
    "Not Transit-Like Flag",
    "Disposition Score",
    "Orbital Period",
    "Diff Image Sky Offset",
    "Centroid Offset Flag",
    "Stellar Eclipse Flag",
    "Number of Transits",
    "KOI Count",
    "Stellar Temp Error Upper",
    "Ephemeris Match Flag",
    "Stellar Density Error Lower",
    "Kepler ID",
    "FW Stat Depth Offset",
    "Transit Depth",
    "RA Offset Error",
    "FW Stat Significance",
    "Planet Radius Error Upper",
    "Centroid Sky Offset",
    "Metallicity Error Lower",
    "Planet-Star Radius Ratio",
    "Diff Image Sky Offset Error",
    "Planet Radius",
    "Planet-Star Distance Ratio",
];

pub fn display_names(variant: ModelVariant) -> &'static [&'static str; SCHEMA_LEN] {
    match variant {
        ModelVariant::Tess => &TESS_DISPLAY_NAMES,
        ModelVariant::Kepler => &KEPLER_DISPLAY_NAMES,
    }
}

/// Rank every schema feature by importance, descending, summing to 1.0
pub fn rank_features(variant: ModelVariant, model: &dyn Classifier) -> Vec<FeatureImportance> {
    let weights = if model.capabilities().importances {
        match model.feature_importances().and_then(normalized) {
            Some(weights) => weights,
            None => {
                warn!(
                    model_type = model.model_type(),
                    "Declared feature importances are unusable, falling back to uniform"
                );
                uniform_importances()
            }
        }
    } else {
        pseudo_random_importances()
    };

    let mut ranked: Vec<FeatureImportance> = display_names(variant)
        .iter()
        .zip(weights)
        .map(|(name, importance)| FeatureImportance::new(*name, importance))
        .collect();

    // Stable sort keeps schema order among ties
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

/// Compose the explanation text for a classification
pub fn explain(classification: u8, confidence: f64, ranked: &[FeatureImportance]) -> String {
    let mut explanation = format!(
        "This observation has been classified as a {} with {:.1}% confidence. ",
        class_label(classification),
        confidence * 100.0
    );

    explanation.push_str(match classification {
        3 => "The transit characteristics strongly indicate the presence of an exoplanet. ",
        2 => "The signal shows promising planetary characteristics but requires further confirmation. ",
        1 => "The signal has ambiguous characteristics that could be either planetary or non-planetary in nature. ",
        _ => "The characteristics do not match typical exoplanet signatures. ",
    });

    let factors: Vec<String> = ranked
        .iter()
        .take(EXPLAINED_FEATURES)
        .map(|f| format!("{} ({:.1}% influence)", f.name, f.importance * 100.0))
        .collect();

    explanation.push_str("Key factors in this classification include: ");
    explanation.push_str(&join_with_and(&factors));
    explanation.push('.');
    explanation
}

/// "a", "a and b", "a, b, and c"
fn join_with_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

/// Native weights rescaled to sum to 1; None when they cannot be used
fn normalized(weights: &[f64]) -> Option<Vec<f64>> {
    if weights.len() != SCHEMA_LEN || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }
    if (total - 1.0).abs() <= 1e-9 {
        return Some(weights.to_vec());
    }
    Some(weights.iter().map(|w| w / total).collect())
}

fn pseudo_random_importances() -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(IMPORTANCE_SEED);
    let raw: Vec<f64> = (0..SCHEMA_LEN).map(|_| rng.gen::<f64>()).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

fn uniform_importances() -> Vec<f64> {
    vec![1.0 / SCHEMA_LEN as f64; SCHEMA_LEN]
}
