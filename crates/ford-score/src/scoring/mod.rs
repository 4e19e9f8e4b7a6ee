//! FORD score computation.
//!
//! A [`ScoringEngine`] owns a validated [`RuleCatalog`] and turns raw form
//! inputs into a [`PredictionResult`]: every rule is evaluated on its own, the
//! signed points are summed, the sum is clamped to 0–10, and the clamped score
//! is looked up in the rate table and the risk bands. The engine does no I/O
//! and never mutates its catalog, so one instance can serve every request.

mod bands;
pub mod batch;
mod catalog;
pub mod input;
pub mod router;
mod rules;
pub mod schema;
pub mod views;

#[cfg(test)]
mod tests;

pub use batch::{BatchImportError, BatchPrediction, BatchRecord};
pub use catalog::{
    CatalogError, Predicate, PredicateRule, RateTable, RiskColor, RuleCatalog, ScoreBand,
    MAX_SCORE, MIN_SCORE, MODEL_NAME,
};
pub use input::{
    BmiSource, Categorical, Choice, FractureSite, InputValue, InputWarning, Insurance, Mechanism,
    PatientRecord, RawInputs, Sex, Transport,
};
pub use router::scoring_router;
pub use schema::FormSchema;
pub use views::{BandReferenceRow, PredictionReport};

use serde::Serialize;
use tracing::debug;

/// Stateless evaluator bound to a validated catalog.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalog: RuleCatalog,
}

impl ScoringEngine {
    pub fn new(catalog: RuleCatalog) -> Result<Self, CatalogError> {
        catalog.validate()?;
        Ok(Self { catalog })
    }

    pub fn ford() -> Result<Self, CatalogError> {
        Self::new(RuleCatalog::ford())
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Normalizes `inputs` and scores the resulting record.
    pub fn compute_prediction(&self, inputs: &RawInputs) -> Result<PredictionResult, ScoringError> {
        let (record, warnings) = input::normalize(inputs);
        let mut result = self.score_record(&record)?;
        result.warnings = warnings;
        Ok(result)
    }

    pub fn score_record(&self, record: &PatientRecord) -> Result<PredictionResult, ScoringError> {
        let (components, raw_score) = rules::evaluate_rules(self.catalog.rules(), record);
        let score = bands::clamp_score(raw_score);

        let nonhome_pct = self
            .catalog
            .rates()
            .rate_for(score)
            .ok_or(ScoringError::RateTableMiss { score })?;
        let band = bands::select_band(self.catalog.bands(), score)
            .ok_or(ScoringError::BandTableMiss { score })?;

        debug!(raw_score, score, risk = band.label, "computed FORD prediction");

        Ok(PredictionResult {
            score,
            raw_score,
            nonhome_pct,
            risk_label: band.label,
            risk_color: band.color,
            risk_nonhome_pct: band.nonhome_rate,
            components,
            warnings: Vec::new(),
        })
    }
}

/// One rule's contribution, kept for the breakdown table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub key: &'static str,
    pub label: &'static str,
    pub condition: &'static str,
    pub met: bool,
    pub points: i32,
    pub value: i32,
}

/// Scored outcome for a single patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub score: i32,
    pub raw_score: i32,
    pub nonhome_pct: f64,
    pub risk_label: &'static str,
    pub risk_color: RiskColor,
    pub risk_nonhome_pct: f64,
    pub components: Vec<ScoreComponent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<InputWarning>,
}

impl PredictionResult {
    /// Met rules only, ordered by ascending absolute weight for charting.
    pub fn active_components(&self) -> Vec<ScoreComponent> {
        let mut active: Vec<ScoreComponent> = self
            .components
            .iter()
            .filter(|component| component.met)
            .cloned()
            .collect();
        active.sort_by_key(|component| component.points.abs());
        active
    }
}

/// Lookup failures after clamping; only reachable with a malformed catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("rate table has no entry for score {score}")]
    RateTableMiss { score: i32 },
    #[error("no score band covers score {score}")]
    BandTableMiss { score: i32 },
}
