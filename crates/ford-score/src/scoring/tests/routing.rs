use super::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn prediction_endpoint_scores_inputs() {
    let payload = json!({
        "age": 70,
        "hr": "105",
        "insurance": "Medicaid"
    });

    let response = router()
        .oneshot(post_json("/api/v1/ford/predictions", payload.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["model_name"], "FORD Score");
    assert_eq!(body["prediction"]["score"], 2);
    assert_eq!(body["prediction"]["nonhome_pct"], 2.8);
    assert_eq!(body["prediction"]["risk_label"], "Low-Moderate");
    assert_eq!(body["band_reference"][1]["current"], true);
    assert_eq!(body["active_components"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn prediction_endpoint_reports_input_warnings() {
    let payload = json!({ "sex": "unknown", "gcs": "abc" });

    let response = router()
        .oneshot(post_json("/api/v1/ford/predictions", payload.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["prediction"]["score"], 0);
    let warnings = body["prediction"]["warnings"]
        .as_array()
        .expect("warnings array");
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0]["field"], "sex");
    assert_eq!(warnings[1]["field"], "gcs");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let response = router()
        .oneshot(post_json("/api/v1/ford/predictions", "{not json".to_string()))
        .await
        .expect("response");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn schema_endpoint_lists_form_groups() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/v1/ford/schema")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["groups"].as_array().map(Vec::len), Some(4));
    assert_eq!(body["groups"][0]["name"], "Patient Demographics");
    assert_eq!(body["groups"][0]["fields"][0]["type"], "continuous");
    assert_eq!(body["groups"][3]["fields"][1]["default"], "Self-pay");
}

#[tokio::test]
async fn bands_endpoint_returns_reference_table() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/v1/ford/bands")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(4));
    assert_eq!(body[3]["score_range"], "7–10");
    assert_eq!(body[3]["nonhome_rate"], 26.4);
}

#[tokio::test]
async fn batch_endpoint_scores_csv_rows() {
    let payload = json!({
        "csv": "patient_id,gcs,transport\nP1,8,\nP2,,Walk-in\n"
    });

    let response = router()
        .oneshot(post_json(
            "/api/v1/ford/predictions/batch",
            payload.to_string(),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let predictions = body["predictions"].as_array().expect("predictions");
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0]["patient_id"], "P1");
    assert_eq!(predictions[0]["prediction"]["score"], 6);
    assert_eq!(predictions[1]["row"], 2);
    assert_eq!(predictions[1]["prediction"]["raw_score"], -4);
    assert_eq!(predictions[1]["prediction"]["score"], 0);
}

#[tokio::test]
async fn batch_endpoint_rejects_ragged_csv() {
    let payload = json!({ "csv": "age,gcs\n70\n" });

    let response = router()
        .oneshot(post_json(
            "/api/v1/ford/predictions/batch",
            payload.to_string(),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("invalid patient CSV")));
}

#[tokio::test]
async fn non_scalar_values_fall_back_instead_of_failing() {
    let payload = json!({ "age": true, "hr": [120], "insurance": {"plan": "Medicare"} });

    let response = router()
        .oneshot(post_json("/api/v1/ford/predictions", payload.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["prediction"]["score"], 0);
    assert_eq!(body["prediction"]["raw_score"], 0);
    let fields: Vec<&str> = body["prediction"]["warnings"]
        .as_array()
        .expect("warnings array")
        .iter()
        .filter_map(|warning| warning["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["age", "hr", "insurance"]);
    assert_eq!(body["prediction"]["warnings"][0]["received"], "true");
    assert_eq!(body["prediction"]["warnings"][0]["fallback"], "default 50");
}
