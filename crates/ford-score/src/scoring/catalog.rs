use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::input::PatientRecord;
use super::rules::ford_rules;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 10;

pub const MODEL_NAME: &str = "FORD Score";

pub type Predicate = fn(&PatientRecord) -> bool;

/// Weighted boolean condition over a normalized patient record.
#[derive(Clone, Copy)]
pub struct PredicateRule {
    pub key: &'static str,
    pub label: &'static str,
    pub condition: &'static str,
    pub points: i32,
    pub predicate: Predicate,
}

impl PredicateRule {
    pub fn evaluate(&self, record: &PatientRecord) -> bool {
        (self.predicate)(record)
    }
}

impl fmt::Debug for PredicateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRule")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("condition", &self.condition)
            .field("points", &self.points)
            .finish_non_exhaustive()
    }
}

/// Display token for a risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskColor {
    Green,
    Orange,
    Red,
}

impl RiskColor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

/// Risk band covering every score from the previous band's max + 1 up to `max_score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBand {
    pub max_score: i32,
    pub label: &'static str,
    pub color: RiskColor,
    pub nonhome_rate: f64,
}

/// Observed non-home discharge rate (%) per integer score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<i32, f64>,
}

impl RateTable {
    pub fn new(rates: impl IntoIterator<Item = (i32, f64)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    pub fn rate_for(&self, score: i32) -> Option<f64> {
        self.rates.get(&score).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.rates.iter().map(|(score, rate)| (*score, *rate))
    }
}

/// Static scoring configuration: rules, rate table, and risk bands.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    model_name: &'static str,
    rules: Vec<PredicateRule>,
    rates: RateTable,
    bands: Vec<ScoreBand>,
}

impl RuleCatalog {
    pub fn new(
        model_name: &'static str,
        rules: Vec<PredicateRule>,
        rates: RateTable,
        bands: Vec<ScoreBand>,
    ) -> Self {
        Self {
            model_name,
            rules,
            rates,
            bands,
        }
    }

    /// The published FORD rule set.
    pub fn ford() -> Self {
        let rates = RateTable::new([
            (0, 0.7),
            (1, 1.7),
            (2, 2.8),
            (3, 2.9),
            (4, 3.9),
            (5, 9.6),
            (6, 9.3),
            (7, 14.7),
            (8, 18.0),
            (9, 22.9),
            (10, 44.8),
        ]);

        let bands = vec![
            ScoreBand {
                max_score: 1,
                label: "Low",
                color: RiskColor::Green,
                nonhome_rate: 1.2,
            },
            ScoreBand {
                max_score: 3,
                label: "Low-Moderate",
                color: RiskColor::Orange,
                nonhome_rate: 3.1,
            },
            ScoreBand {
                max_score: 6,
                label: "Moderate-High",
                color: RiskColor::Orange,
                nonhome_rate: 7.0,
            },
            ScoreBand {
                max_score: 10,
                label: "High",
                color: RiskColor::Red,
                nonhome_rate: 26.4,
            },
        ];

        Self::new(MODEL_NAME, ford_rules(), rates, bands)
    }

    pub fn model_name(&self) -> &'static str {
        self.model_name
    }

    pub fn rules(&self) -> &[PredicateRule] {
        &self.rules
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn bands(&self) -> &[ScoreBand] {
        &self.bands
    }

    /// Checks that every clamped score has a rate and exactly one band.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.rules.is_empty() {
            return Err(CatalogError::NoRules);
        }

        let mut keys = HashSet::new();
        for rule in &self.rules {
            if !keys.insert(rule.key) {
                return Err(CatalogError::DuplicateRuleKey { key: rule.key });
            }
        }

        for score in MIN_SCORE..=MAX_SCORE {
            match self.rates.rate_for(score) {
                None => return Err(CatalogError::MissingRate { score }),
                Some(rate) if !is_percentage(rate) => {
                    return Err(CatalogError::InvalidRate { score, rate })
                }
                Some(_) => {}
            }
        }

        let first = self.bands.first().ok_or(CatalogError::NoBands)?;
        if first.max_score < MIN_SCORE {
            return Err(CatalogError::BandBelowRange {
                label: first.label,
                max_score: first.max_score,
            });
        }

        for pair in self.bands.windows(2) {
            if pair[1].max_score <= pair[0].max_score {
                return Err(CatalogError::BandOrder {
                    label: pair[1].label,
                    max_score: pair[1].max_score,
                    previous: pair[0].max_score,
                });
            }
        }

        for band in &self.bands {
            if !is_percentage(band.nonhome_rate) {
                return Err(CatalogError::InvalidBandRate {
                    label: band.label,
                    rate: band.nonhome_rate,
                });
            }
        }

        let last = &self.bands[self.bands.len() - 1];
        if last.max_score != MAX_SCORE {
            return Err(CatalogError::BandCoverage {
                last: last.max_score,
            });
        }

        Ok(())
    }
}

fn is_percentage(rate: f64) -> bool {
    rate.is_finite() && (0.0..=100.0).contains(&rate)
}

/// Structural problems in a rule catalog.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog defines no scoring rules")]
    NoRules,
    #[error("rule key '{key}' is defined more than once")]
    DuplicateRuleKey { key: &'static str },
    #[error("rate table has no entry for score {score}")]
    MissingRate { score: i32 },
    #[error("rate {rate} for score {score} is not a percentage")]
    InvalidRate { score: i32, rate: f64 },
    #[error("catalog defines no score bands")]
    NoBands,
    #[error("band '{label}' ends at {max_score}, below the minimum score")]
    BandBelowRange { label: &'static str, max_score: i32 },
    #[error("band '{label}' ends at {max_score}, not above the previous band's {previous}")]
    BandOrder {
        label: &'static str,
        max_score: i32,
        previous: i32,
    },
    #[error("band '{label}' rate {rate} is not a percentage")]
    InvalidBandRate { label: &'static str, rate: f64 },
    #[error("last band ends at {last}; bands must reach score {}", MAX_SCORE)]
    BandCoverage { last: i32 },
}
