//! Feature Vectorizer
//!
//! Maps a loosely typed observation onto the fixed, ordered feature schema
//! of a model variant. The schema order is the contract with the trained
//! artifact: the model was fitted on columns in exactly this order and raw
//! units, so no scaling happens here.
//!
//! Defaulting rules per schema slot:
//! - key absent, `null`, or `""` → 0.0
//! - number → itself, boolean → 1.0 / 0.0
//! - numeric string (surrounding whitespace and `_` digit separators
//!   allowed) → parsed value
//! - anything else → [`AnalysisError::FeatureType`] for the whole call

use serde_json::Value;

use crate::error::AnalysisError;
use crate::models::{FeatureVector, ModelVariant, Observation};

/// Length of every variant schema
pub const SCHEMA_LEN: usize = 24;

/// TESS Objects of Interest feature order
pub const TESS_SCHEMA: [&str; SCHEMA_LEN] = [
    "pl_radeerr1",
    "st_rad",
    "pl_orbper",
    "st_dist",
    "st_disterr2",
    "pl_trandep",
    "pl_rade",
    "st_pmra",
    "pl_orbpererr2",
    "pl_tranmiderr2",
    "pl_tranmid",
    "pl_eqt",
    "st_tmag",
    "pl_trandeperr1",
    "pl_trandeperr2",
    "pl_orbpererr1",
    "st_logg",
    "pl_insol",
    "st_tefferr2",
    "st_teff",
    "st_disterr1",
    "pl_trandurh",
    "pl_trandurherr1",
    "pl_tranmiderr1",
];

/// Kepler Objects of Interest feature order
pub const KEPLER_SCHEMA: [&str; SCHEMA_LEN] = [
    "rowid",
    "koi_fpflag_nt",
    "koi_score",
    "koi_period",
    "koi_dikco_msky",
    "koi_fpflag_co",
    "koi_fpflag_ss",
    "koi_num_transits",
    "koi_count",
    "koi_steff_err1",
    "koi_fpflag_ec",
    "koi_srho_err2",
    "kepid",
    "koi_fwm_sdeco",
    "koi_depth",
    "koi_dikco_mra_err",
    "koi_fwm_stat_sig",
    "koi_prad_err1",
    "koi_dicco_msky",
    "koi_smet_err2",
    "koi_ror",
    "koi_dikco_msky_err",
    "koi_prad",
    "koi_dor",
];

/// Ordered feature keys for a variant
pub fn schema(variant: ModelVariant) -> &'static [&'static str; SCHEMA_LEN] {
    match variant {
        ModelVariant::Tess => &TESS_SCHEMA,
        ModelVariant::Kepler => &KEPLER_SCHEMA,
    }
}

/// Build the feature vector for one observation
pub fn vectorize(
    observation: &Observation,
    variant: ModelVariant,
) -> Result<FeatureVector, AnalysisError> {
    schema(variant)
        .iter()
        .map(|key| match observation.get(*key) {
            None => Ok(0.0),
            Some(value) => coerce_feature(key, value),
        })
        .collect()
}

fn coerce_feature(feature: &str, value: &Value) -> Result<f64, AnalysisError> {
    let type_error = || AnalysisError::FeatureType {
        feature: feature.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().ok_or_else(type_error),
        Value::String(s) if s.is_empty() => Ok(0.0),
        Value::String(s) => parse_number(s.trim()).ok_or_else(type_error),
        Value::Array(_) | Value::Object(_) => Err(type_error()),
    }
}

/// Decimal float, allowing single `_` separators between digits ("1_000.5")
fn parse_number(s: &str) -> Option<f64> {
    if !s.contains('_') {
        return s.parse().ok();
    }
    let bytes = s.as_bytes();
    let separators_ok = bytes.iter().enumerate().all(|(i, b)| {
        *b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !separators_ok {
        return None;
    }
    s.replace('_', "").parse().ok()
}
