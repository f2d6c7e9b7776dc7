//! Summary statistics for an analyzed dataset
//!
//! Rows whose classification is missing or not one of 0/2/3 count as
//! ambiguous, so the four class counts always add up to the row count.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::models::{DatasetSummary, ModelMetrics, Observation};

/// Rows below this confidence are reported as low confidence
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Rows at or above this confidence are reported as high confidence
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.9;

/// Version label reported with every dataset analysis
pub const MODEL_VERSION: &str = "1.0";

pub fn summarize(rows: &[Observation]) -> DatasetSummary {
    let mut summary = DatasetSummary {
        total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        match row.get("classification").and_then(class_id) {
            Some(3) => summary.planets += 1,
            Some(2) => summary.candidates += 1,
            Some(0) => summary.non_planets += 1,
            _ => summary.ambiguous += 1,
        }
    }
    summary
}

pub fn model_metrics(rows: &[Observation], now: DateTime<Utc>) -> ModelMetrics {
    let confidences: Vec<f64> = rows
        .iter()
        .map(|row| row.get("confidence").and_then(confidence_value).unwrap_or(0.0))
        .collect();

    let average_confidence = if confidences.is_empty() {
        0.0
    } else {
        confidences.iter().sum::<f64>() / confidences.len() as f64
    };

    ModelMetrics {
        average_confidence,
        low_confidence_count: confidences
            .iter()
            .filter(|c| **c < LOW_CONFIDENCE_THRESHOLD)
            .count(),
        high_confidence_count: confidences
            .iter()
            .filter(|c| **c >= HIGH_CONFIDENCE_THRESHOLD)
            .count(),
        model_version: MODEL_VERSION.to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Integer class id from a number, integral float, or numeric string
fn class_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn confidence_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|c: &f64| c.is_finite())
}
