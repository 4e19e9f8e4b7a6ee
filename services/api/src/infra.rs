use ford_score::error::AppError;
use ford_score::scoring::ScoringEngine;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the engine from the published catalog, failing if the catalog is inconsistent.
pub(crate) fn load_engine() -> Result<ScoringEngine, AppError> {
    let engine = ScoringEngine::ford()?;
    let catalog = engine.catalog();
    info!(
        model = catalog.model_name(),
        rules = catalog.rules().len(),
        bands = catalog.bands().len(),
        "rule catalog validated"
    );
    Ok(engine)
}
