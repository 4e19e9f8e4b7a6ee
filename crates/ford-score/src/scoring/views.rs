use serde::Serialize;

use super::bands::band_ranges;
use super::catalog::{RiskColor, RuleCatalog};
use super::{PredictionResult, ScoreComponent};

/// Row of the risk level reference table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandReferenceRow {
    pub score_range: String,
    pub low: i32,
    pub high: i32,
    pub label: &'static str,
    pub color: RiskColor,
    pub nonhome_rate: f64,
    pub current: bool,
}

/// Reference rows for every band; `score` marks the band it falls in.
pub fn band_reference(catalog: &RuleCatalog, score: Option<i32>) -> Vec<BandReferenceRow> {
    band_ranges(catalog.bands())
        .into_iter()
        .map(|(low, band)| {
            let high = band.max_score;
            BandReferenceRow {
                score_range: format_range(low, high),
                low,
                high,
                label: band.label,
                color: band.color,
                nonhome_rate: band.nonhome_rate,
                current: score.is_some_and(|score| (low..=high).contains(&score)),
            }
        })
        .collect()
}

fn format_range(low: i32, high: i32) -> String {
    if low == high {
        low.to_string()
    } else {
        format!("{low}\u{2013}{high}")
    }
}

/// Everything a results page renders for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub model_name: &'static str,
    pub prediction: PredictionResult,
    pub band_reference: Vec<BandReferenceRow>,
    pub active_components: Vec<ScoreComponent>,
}

impl PredictionReport {
    pub fn new(catalog: &RuleCatalog, prediction: PredictionResult) -> Self {
        let band_reference = band_reference(catalog, Some(prediction.score));
        let active_components = prediction.active_components();
        Self {
            model_name: catalog.model_name(),
            prediction,
            band_reference,
            active_components,
        }
    }

    pub fn current_band(&self) -> Option<&BandReferenceRow> {
        self.band_reference.iter().find(|row| row.current)
    }
}
