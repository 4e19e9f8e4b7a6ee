//! Scoring many patients from a CSV export.
//!
//! Headers name input fields (`age`, `gcs`, `insurance`, ...). Blank cells are
//! treated as absent so the usual defaults apply. An optional `patient_id`
//! column is carried through to the output untouched.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::input::{InputValue, RawInputs};
use super::{PredictionResult, ScoringEngine, ScoringError};

const PATIENT_ID_COLUMN: &str = "patient_id";

#[derive(Debug, thiserror::Error)]
pub enum BatchImportError {
    #[error("failed to read patient export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid patient CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV row; `row` is 1-based and excludes the header.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord {
    pub row: usize,
    pub patient_id: Option<String>,
    pub inputs: RawInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPrediction {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub prediction: PredictionResult,
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<BatchRecord>, BatchImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader
        .deserialize::<HashMap<String, String>>()
        .enumerate()
    {
        let mut row = row?;
        let patient_id = row
            .remove(PATIENT_ID_COLUMN)
            .filter(|value| !value.is_empty());
        let inputs = row
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(column, value)| (column, InputValue::Text(value)))
            .collect();

        records.push(BatchRecord {
            row: index + 1,
            patient_id,
            inputs,
        });
    }

    Ok(records)
}

pub fn read_records_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<BatchRecord>, BatchImportError> {
    let file = std::fs::File::open(path)?;
    read_records(file)
}

pub fn score_batch(
    engine: &ScoringEngine,
    records: &[BatchRecord],
) -> Result<Vec<BatchPrediction>, ScoringError> {
    records
        .iter()
        .map(|record| {
            Ok(BatchPrediction {
                row: record.row,
                patient_id: record.patient_id.clone(),
                prediction: engine.compute_prediction(&record.inputs)?,
            })
        })
        .collect()
}
