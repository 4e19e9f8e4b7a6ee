use crate::infra::load_engine;
use clap::Args;
use ford_score::error::AppError;
use ford_score::scoring::batch::{read_records_from_path, score_batch};
use ford_score::scoring::input::field;
use ford_score::scoring::{BatchPrediction, FormSchema, PredictionReport, RawInputs};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Age in years (default 50)
    #[arg(long)]
    pub(crate) age: Option<f64>,
    /// Male or Female
    #[arg(long)]
    pub(crate) sex: Option<String>,
    /// Glasgow Coma Scale, 3-15 (default 15)
    #[arg(long)]
    pub(crate) gcs: Option<f64>,
    /// Systolic blood pressure in mmHg (default 120)
    #[arg(long)]
    pub(crate) sbp: Option<f64>,
    /// Heart rate in bpm (default 75)
    #[arg(long)]
    pub(crate) hr: Option<f64>,
    /// Respiratory rate in breaths/min (default 16)
    #[arg(long)]
    pub(crate) rr: Option<f64>,
    /// Body mass index; overrides height and weight when given
    #[arg(long)]
    pub(crate) bmi: Option<f64>,
    /// Height in inches (default 68)
    #[arg(long)]
    pub(crate) height_in: Option<f64>,
    /// Weight in pounds (default 170)
    #[arg(long)]
    pub(crate) weight_lb: Option<f64>,
    /// Other, Hip/Femur, Axial (Spine/Rib/Pelvis), or Both
    #[arg(long)]
    pub(crate) fracture_site: Option<String>,
    /// Fall, MVC, Assault, or Other
    #[arg(long)]
    pub(crate) mechanism: Option<String>,
    /// Ambulance/Air, Private Vehicle, Walk-in, or Other
    #[arg(long)]
    pub(crate) transport: Option<String>,
    /// Self-pay, Medicare, Medicaid, Private, Charity, or Other
    #[arg(long)]
    pub(crate) insurance: Option<String>,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl ScoreArgs {
    pub(crate) fn inputs(&self) -> RawInputs {
        let numbers = [
            (field::AGE, self.age),
            (field::GCS, self.gcs),
            (field::SBP, self.sbp),
            (field::HR, self.hr),
            (field::RR, self.rr),
            (field::BMI, self.bmi),
            (field::HEIGHT_IN, self.height_in),
            (field::WEIGHT_LB, self.weight_lb),
        ];
        let choices = [
            (field::SEX, &self.sex),
            (field::FRACTURE_SITE, &self.fracture_site),
            (field::MECHANISM, &self.mechanism),
            (field::TRANSPORT, &self.transport),
            (field::INSURANCE, &self.insurance),
        ];

        let mut inputs = RawInputs::new();
        for (name, value) in numbers {
            if let Some(value) = value {
                inputs.insert(name, value);
            }
        }
        for (name, value) in choices {
            if let Some(value) = value {
                inputs.insert(name, value.as_str());
            }
        }
        inputs
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with one patient per row; headers name input fields
    pub(crate) path: PathBuf,
    /// Print predictions as JSON instead of a summary table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let engine = load_engine()?;
    let prediction = engine.compute_prediction(&args.inputs())?;
    let report = PredictionReport::new(engine.catalog(), prediction);

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(stdout)?;
    } else {
        render_report(&mut stdout, &report)?;
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let engine = load_engine()?;
    let records = read_records_from_path(&args.path)?;
    let predictions = score_batch(&engine, &records)?;

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &predictions)?;
        writeln!(stdout)?;
    } else {
        writeln!(
            stdout,
            "Scored {} patients from {}",
            predictions.len(),
            args.path.display()
        )?;
        render_batch(&mut stdout, &predictions)?;
    }
    Ok(())
}

pub(crate) fn run_schema() -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &FormSchema::ford())?;
    writeln!(stdout)?;
    Ok(())
}

pub(crate) fn render_report<W: Write>(out: &mut W, report: &PredictionReport) -> io::Result<()> {
    let prediction = &report.prediction;

    writeln!(out, "{}", report.model_name)?;
    writeln!(
        out,
        "Predicted non-home discharge: {:.1}% (score {}/10, raw {})",
        prediction.nonhome_pct, prediction.score, prediction.raw_score
    )?;
    writeln!(
        out,
        "Risk level: {} [{}] | band non-home rate {:.1}%",
        prediction.risk_label,
        prediction.risk_color.as_str(),
        prediction.risk_nonhome_pct
    )?;

    writeln!(out, "\nRisk level reference")?;
    for row in &report.band_reference {
        let marker = if row.current { ">" } else { " " };
        writeln!(
            out,
            "{} {:<6} {:<14} {:>5.1}%",
            marker, row.score_range, row.label, row.nonhome_rate
        )?;
    }

    writeln!(out, "\nScore breakdown")?;
    for component in &prediction.components {
        let check = if component.met { "x" } else { " " };
        writeln!(
            out,
            "  [{}] {:<28} {:<34} {:+}",
            check, component.label, component.condition, component.value
        )?;
    }

    if report.active_components.is_empty() {
        writeln!(out, "\nActive components: none")?;
    } else {
        writeln!(out, "\nActive components")?;
        for component in &report.active_components {
            writeln!(out, "- {} ({:+})", component.label, component.points)?;
        }
    }

    if !prediction.warnings.is_empty() {
        writeln!(out, "\nInput warnings")?;
        for warning in &prediction.warnings {
            writeln!(
                out,
                "- {}: received '{}'; {}",
                warning.field, warning.received, warning.fallback
            )?;
        }
    }

    Ok(())
}

pub(crate) fn render_batch<W: Write>(out: &mut W, predictions: &[BatchPrediction]) -> io::Result<()> {
    for item in predictions {
        let prediction = &item.prediction;
        let patient = item.patient_id.as_deref().unwrap_or("-");
        writeln!(
            out,
            "row {:>4}  {:<12} score {:>2}  {:<14} {:>5.1}% non-home{}",
            item.row,
            patient,
            prediction.score,
            prediction.risk_label,
            prediction.nonhome_pct,
            if prediction.warnings.is_empty() {
                String::new()
            } else {
                format!("  ({} input warnings)", prediction.warnings.len())
            }
        )?;
    }
    Ok(())
}
