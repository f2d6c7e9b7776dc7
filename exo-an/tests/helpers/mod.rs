//! Shared fixtures for exo-an integration tests
//!
//! Each test app gets its own temp directory holding `models/` and `data/`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use exo_common::config::ServiceConfig;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

use exo_an::{build_router, models::ModelVariant, AppState};

pub const SCHEMA_LEN: usize = 24;

/// Test application plus the directory backing it
pub struct TestApp {
    pub dir: TempDir,
    pub router: Router,
}

/// Build an app over a fresh temp dir; `setup` writes fixtures before the
/// state is created
pub fn test_app(mock_seed: Option<u64>, setup: impl FnOnce(&Path, &Path)) -> TestApp {
    let dir = TempDir::new().unwrap();
    let models_dir = dir.path().join("models");
    let datasets_dir = dir.path().join("data");
    std::fs::create_dir_all(&models_dir).unwrap();
    std::fs::create_dir_all(&datasets_dir).unwrap();

    setup(&models_dir, &datasets_dir);

    let config = ServiceConfig {
        models_dir,
        datasets_dir,
        mock_seed,
        ..ServiceConfig::default()
    };
    let router = build_router(AppState::new(&config));
    TestApp { dir, router }
}

/// TESS decision tree splitting on orbital period (schema slot 2) at 10 days
///
/// - period <= 10 → counts [1, 0, 0, 9]: confirmed planet, confidence 0.9
/// - period > 10  → counts [0, 1, 8, 1]: planet candidate, confidence 0.8
pub fn tess_tree_artifact() -> Value {
    let mut importances = vec![0.0; SCHEMA_LEN];
    importances[2] = 0.6;
    importances[5] = 0.3;
    importances[6] = 0.1;

    json!({
        "n_features": SCHEMA_LEN,
        "estimator": {
            "kind": "decision_tree",
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [2, -2, -2],
            "threshold": [10.0, -2.0, -2.0],
            "value": [[1.0, 1.0, 8.0, 10.0], [1.0, 0.0, 0.0, 9.0], [0.0, 1.0, 8.0, 1.0]],
            "feature_importances": importances
        }
    })
}

pub fn write_artifact(models_dir: &Path, variant: ModelVariant, artifact: &Value) {
    std::fs::write(
        models_dir.join(variant.artifact_file_name()),
        serde_json::to_string_pretty(artifact).unwrap(),
    )
    .unwrap();
}

pub fn write_csv(datasets_dir: &Path, id: &str, content: &str) {
    std::fs::write(datasets_dir.join(format!("{}_clean.csv", id)), content).unwrap();
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, &body.to_string())
}

pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
