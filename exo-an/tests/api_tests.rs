//! Integration tests for exo-an HTTP endpoints
//!
//! Drive the full router with `oneshot`; model artifacts and dataset tables
//! are written to a temp directory per test.

mod helpers;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use exo_an::models::ModelVariant;
use helpers::*;

fn with_tess_tree() -> TestApp {
    test_app(None, |models, _| {
        write_artifact(models, ModelVariant::Tess, &tess_tree_artifact())
    })
}

// =============================================================================
// Service endpoints
// =============================================================================

#[tokio::test]
async fn test_root_banner() {
    let app = test_app(None, |_, _| {});

    let response = app.router.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Exoplanet API is running!"})
    );
}

#[tokio::test]
async fn test_health_reports_model_status() {
    let app = with_tess_tree();

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "exo-an");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_u64());
    assert_eq!(body["models"], json!({"tess": "not_loaded", "kepler": "not_loaded"}));

    for model in ["tess", "kepler"] {
        let request = post_json(
            "/analyze-observation",
            &json!({"observation": {}, "model": model}),
        );
        app.router.clone().oneshot(request).await.unwrap();
    }

    let body = body_json(app.router.oneshot(get("/health")).await.unwrap()).await;
    assert_eq!(body["models"], json!({"tess": "loaded", "kepler": "unavailable"}));
}

#[tokio::test]
async fn test_buildinfo() {
    let app = test_app(None, |_, _| {});

    let response = app.router.oneshot(get("/api/buildinfo")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_timestamp"].is_string());
    assert!(body["build_profile"].is_string());
}

// =============================================================================
// POST /analyze-observation
// =============================================================================

#[tokio::test]
async fn test_observation_with_trained_tree() {
    let app = with_tess_tree();
    let request = post_json(
        "/analyze-observation",
        &json!({
            "observation": {"pl_orbper": "3.5", "pl_rade": 1.2, "st_teff": null, "extra": "ignored"},
            "model": "tess"
        }),
    );

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["classification"], 3);
    assert_eq!(body["confidence"], 0.9);
    assert_eq!(body["probabilities"], json!([0.1, 0.0, 0.0, 0.9]));
    assert_eq!(
        body["explanation"],
        "This observation has been classified as a confirmed planet with 90.0% confidence. \
         The transit characteristics strongly indicate the presence of an exoplanet. \
         Key factors in this classification include: Orbital Period (60.0% influence), \
         Transit Depth (30.0% influence), and Planet Radius (10.0% influence)."
    );
    assert_eq!(
        body["details"],
        json!({"model_type": "DecisionTreeClassifier", "features_used": 24})
    );

    let importance = body["feature_importance"].as_array().unwrap();
    assert_eq!(importance.len(), 10);
    assert_eq!(importance[0], json!({"name": "Orbital Period", "importance": 0.6}));
    assert_eq!(importance[1], json!({"name": "Transit Depth", "importance": 0.3}));
    assert_eq!(importance[2], json!({"name": "Planet Radius", "importance": 0.1}));
}

#[tokio::test]
async fn test_model_defaults_to_tess() {
    let app = with_tess_tree();
    let request = post_json(
        "/analyze-observation",
        &json!({"observation": {"pl_orbper": 42.0}, "hyperparameters": {"max_depth": 4}}),
    );

    let body = body_json(app.router.oneshot(request).await.unwrap()).await;

    assert_eq!(body["classification"], 2);
    assert_eq!(body["confidence"], 0.8);
    assert_eq!(body["details"]["model_type"], "DecisionTreeClassifier");
}

#[tokio::test]
async fn test_observation_without_model_returns_mock() {
    let app = with_tess_tree();
    let request = post_json(
        "/analyze-observation",
        &json!({"observation": {"koi_period": 9.4}, "model": "kepler"}),
    );

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["classification"], 2);
    assert_eq!(body["confidence"], 0.75);
    assert_eq!(body["probabilities"], json!([0.05, 0.15, 0.75, 0.05]));
    assert_eq!(body["feature_importance"][0]["name"], "Transit Depth");
    assert!(body["explanation"]
        .as_str()
        .unwrap()
        .starts_with("This is a mock analysis."));
}

#[tokio::test]
async fn test_unparseable_feature_degrades_not_fails() {
    let app = with_tess_tree();
    let request = post_json(
        "/analyze-observation",
        &json!({"observation": {"pl_orbper": "abc"}}),
    );

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["classification"], 1);
    assert_eq!(body["confidence"], 0.5);
    assert!(body["details"]["error"].as_str().unwrap().contains("pl_orbper"));
}

#[tokio::test]
async fn test_non_finite_feature_degrades_tree_prediction() {
    let app = with_tess_tree();

    for value in ["inf", "nan", "1e400"] {
        let request = post_json(
            "/analyze-observation",
            &json!({"observation": {"pl_orbper": value}, "model": "tess"}),
        );

        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["classification"], 1, "value {}", value);
        assert_eq!(body["confidence"], 0.5, "value {}", value);
        assert!(body["details"]["error"].is_string(), "value {}", value);
        assert!(body["details"].get("model_type").is_none());
    }
}

#[tokio::test]
async fn test_unknown_model_is_bad_request() {
    let app = with_tess_tree();
    let request = post_json(
        "/analyze-observation",
        &json!({"observation": {}, "model": "hubble"}),
    );

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("hubble"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = with_tess_tree();

    for body in ["{not json", r#"{"model": "tess"}"#, r#"{"observation": [1, 2]}"#] {
        let response = app
            .router
            .clone()
            .oneshot(post_raw("/analyze-observation", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(body_json(response).await["status"], "error");
    }
}

// =============================================================================
// POST /analyze-dataset
// =============================================================================

fn summary_total(summary: &Value) -> u64 {
    ["planets", "candidates", "ambiguous", "non_planets"]
        .iter()
        .map(|k| summary[k].as_u64().unwrap())
        .sum()
}

#[tokio::test]
async fn test_dataset_with_trained_tree() {
    let app = with_tess_tree();
    let request = post_json(
        "/analyze-dataset",
        &json!({
            "observations": [
                {"toi": 101.01, "pl_orbper": 2.0},
                {"toi": 102.01, "pl_orbper": 30.0},
                {"toi": 103.01, "pl_orbper": ""}
            ],
            "model": "tess"
        }),
    );

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["analyzed_data"],
        json!([
            {"toi": 101.01, "pl_orbper": 2.0, "classification": 3, "confidence": 0.9},
            {"toi": 102.01, "pl_orbper": 30.0, "classification": 2, "confidence": 0.8},
            {"toi": 103.01, "pl_orbper": "", "classification": 3, "confidence": 0.9}
        ])
    );
    assert_eq!(
        body["summary"],
        json!({"total": 3, "planets": 2, "candidates": 1, "ambiguous": 0, "non_planets": 0})
    );

    let metrics = &body["model_metrics"];
    assert!((metrics["average_confidence"].as_f64().unwrap() - 2.6 / 3.0).abs() < 1e-9);
    assert_eq!(metrics["low_confidence_count"], 0);
    assert_eq!(metrics["high_confidence_count"], 2);
    assert_eq!(metrics["model_version"], "1.0");
    assert!(chrono::DateTime::parse_from_rfc3339(metrics["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_prelabeled_dataset_passthrough() {
    let app = with_tess_tree();
    let request = post_json(
        "/analyze-dataset",
        &json!({"observations": [{"classification": 3}]}),
    );

    let body = body_json(app.router.oneshot(request).await.unwrap()).await;

    assert_eq!(
        body["analyzed_data"],
        json!([{"classification": 3, "confidence": 0.95}])
    );
    assert_eq!(body["summary"]["planets"], 1);
    assert_eq!(body["model_metrics"]["high_confidence_count"], 1);
}

#[tokio::test]
async fn test_dataset_failure_degrades_every_row() {
    let app = with_tess_tree();
    let request = post_json(
        "/analyze-dataset",
        &json!({"observations": [
            {"pl_orbper": 1.0},
            {"pl_orbper": 2.0},
            {"pl_orbper": {"nested": true}}
        ]}),
    );

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    for row in body["analyzed_data"].as_array().unwrap() {
        assert_eq!(row["classification"], 1);
        assert_eq!(row["confidence"], 0.5);
    }
    assert_eq!(body["summary"]["ambiguous"], 3);
    assert_eq!(body["model_metrics"]["low_confidence_count"], 3);
}

#[tokio::test]
async fn test_mock_dataset_is_seeded_and_consistent() {
    let observations: Vec<Value> = (0..40).map(|i| json!({"kepid": i})).collect();
    let request = json!({"observations": observations, "model": "kepler"});

    let first = test_app(Some(11), |_, _| {});
    let second = test_app(Some(11), |_, _| {});
    let a = body_json(
        first
            .router
            .oneshot(post_json("/analyze-dataset", &request))
            .await
            .unwrap(),
    )
    .await;
    let b = body_json(
        second
            .router
            .oneshot(post_json("/analyze-dataset", &request))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(a["analyzed_data"], b["analyzed_data"]);
    assert_eq!(a["summary"]["total"], 40);
    assert_eq!(summary_total(&a["summary"]), 40);
    for (i, row) in a["analyzed_data"].as_array().unwrap().iter().enumerate() {
        assert_eq!(row["kepid"], i);
        let confidence = row["confidence"].as_f64().unwrap();
        assert!((0.6..=0.95).contains(&confidence));
    }
}

#[tokio::test]
async fn test_empty_dataset() {
    let app = with_tess_tree();

    let body = body_json(
        app.router
            .oneshot(post_json("/analyze-dataset", &json!({"observations": []})))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(body["analyzed_data"], json!([]));
    assert_eq!(body["summary"]["total"], 0);
    assert_eq!(body["model_metrics"]["average_confidence"], 0.0);
}

#[tokio::test]
async fn test_dataset_unknown_model_is_bad_request() {
    let app = with_tess_tree();
    let request = post_json(
        "/analyze-dataset",
        &json!({"observations": [{}], "model": "k2"}),
    );

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "error");
}

// =============================================================================
// Dataset catalog
// =============================================================================

#[tokio::test]
async fn test_list_datasets() {
    let app = test_app(None, |_, _| {});

    let response = app.router.oneshot(get("/datasets")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["id"], "kepler");
    assert_eq!(entries[0]["title"], "Kepler Objects of Interest");
    assert_eq!(entries[1]["model"], "kepler");
    assert_eq!(entries[2]["model"], "tess");
    for entry in entries {
        assert!(entry["description"].is_string());
        assert!(entry["img"].is_string());
    }
}

#[tokio::test]
async fn test_select_dataset_rows_feed_analysis() {
    let app = with_tess_tree_and_table();

    let response = app
        .router
        .clone()
        .oneshot(get("/select-dataset/tess"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["dataset"], "tess");
    assert_eq!(body["model"], "tess");
    assert_eq!(
        body["data"],
        json!([
            {"toi": 101.01, "pl_orbper": 3.5, "tfopwg_disp": "PC"},
            {"toi": 102.01, "pl_orbper": 25, "tfopwg_disp": null}
        ])
    );

    let request = post_json(
        "/analyze-dataset",
        &json!({"observations": body["data"], "model": body["model"]}),
    );
    let analyzed = body_json(app.router.oneshot(request).await.unwrap()).await;
    assert_eq!(analyzed["analyzed_data"][0]["classification"], 3);
    assert_eq!(analyzed["analyzed_data"][1]["classification"], 2);
    assert_eq!(analyzed["analyzed_data"][1]["tfopwg_disp"], Value::Null);
}

fn with_tess_tree_and_table() -> TestApp {
    test_app(None, |models, data| {
        write_artifact(models, ModelVariant::Tess, &tess_tree_artifact());
        write_csv(
            data,
            "tess",
            "toi,pl_orbper,tfopwg_disp\n101.01,3.5,PC\n102.01,25,\n",
        );
    })
}

#[tokio::test]
async fn test_select_unknown_dataset_is_not_found() {
    let app = test_app(None, |_, _| {});

    let response = app.router.oneshot(get("/select-dataset/hubble")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("hubble"));
}

#[tokio::test]
async fn test_select_dataset_missing_table_is_server_error() {
    let app = test_app(None, |_, _| {});

    let response = app.router.oneshot(get("/select-dataset/k2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["status"], "error");
}

#[tokio::test]
async fn test_cors_is_permissive() {
    let app = test_app(None, |_, _| {});
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/datasets")
        .header("origin", "http://localhost:5173")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
