use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::scoring::{
    scoring_router, PredictionResult, RawInputs, ScoreComponent, ScoringEngine,
};

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::ford().expect("published catalog is valid")
}

pub(super) fn router() -> axum::Router {
    scoring_router(Arc::new(engine()))
}

pub(super) fn predict(inputs: RawInputs) -> PredictionResult {
    engine()
        .compute_prediction(&inputs)
        .expect("prediction succeeds")
}

pub(super) fn component<'a>(result: &'a PredictionResult, key: &str) -> &'a ScoreComponent {
    result
        .components
        .iter()
        .find(|component| component.key == key)
        .unwrap_or_else(|| panic!("component {key} present"))
}

pub(super) fn met_keys(result: &PredictionResult) -> Vec<&'static str> {
    result
        .components
        .iter()
        .filter(|component| component.met)
        .map(|component| component.key)
        .collect()
}

pub(super) async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json body")
}
