use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::batch::{read_records, score_batch, BatchPrediction};
use super::input::RawInputs;
use super::schema::FormSchema;
use super::views::{band_reference, PredictionReport};
use super::ScoringEngine;

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchResponse {
    pub(crate) predictions: Vec<BatchPrediction>,
}

/// Router exposing the form schema, band reference, and scoring endpoints.
pub fn scoring_router(engine: Arc<ScoringEngine>) -> Router {
    Router::new()
        .route("/api/v1/ford/schema", get(schema_handler))
        .route("/api/v1/ford/bands", get(bands_handler))
        .route("/api/v1/ford/predictions", post(prediction_handler))
        .route("/api/v1/ford/predictions/batch", post(batch_handler))
        .with_state(engine)
}

pub(crate) async fn schema_handler() -> Json<FormSchema> {
    Json(FormSchema::ford())
}

pub(crate) async fn bands_handler(State(engine): State<Arc<ScoringEngine>>) -> Response {
    let rows = band_reference(engine.catalog(), None);
    (StatusCode::OK, Json(rows)).into_response()
}

pub(crate) async fn prediction_handler(
    State(engine): State<Arc<ScoringEngine>>,
    Json(inputs): Json<RawInputs>,
) -> Response {
    match engine.compute_prediction(&inputs) {
        Ok(prediction) => {
            let report = PredictionReport::new(engine.catalog(), prediction);
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(err) => {
            error!(%err, "FORD scoring failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn batch_handler(
    State(engine): State<Arc<ScoringEngine>>,
    Json(request): Json<BatchRequest>,
) -> Response {
    let records = match read_records(request.csv.as_bytes()) {
        Ok(records) => records,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match score_batch(&engine, &records) {
        Ok(predictions) => (StatusCode::OK, Json(BatchResponse { predictions })).into_response(),
        Err(err) => {
            error!(%err, rows = records.len(), "FORD batch scoring failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
