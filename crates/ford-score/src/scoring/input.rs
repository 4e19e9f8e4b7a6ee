//! Raw form inputs and the typed patient record the rules read.
//!
//! Parsing is permissive: absent, null, or blank fields take their documented
//! defaults, and values that cannot be used fall back as well while leaving an
//! [`InputWarning`] behind so callers can surface what happened.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Field names accepted in a [`RawInputs`] mapping.
pub mod field {
    pub const AGE: &str = "age";
    pub const SEX: &str = "sex";
    pub const GCS: &str = "gcs";
    pub const SBP: &str = "sbp";
    pub const HR: &str = "hr";
    pub const RR: &str = "rr";
    pub const BMI: &str = "bmi";
    pub const HEIGHT_IN: &str = "height_in";
    pub const WEIGHT_LB: &str = "weight_lb";
    pub const FRACTURE_SITE: &str = "fracture_site";
    pub const MECHANISM: &str = "mechanism";
    pub const TRANSPORT: &str = "transport";
    pub const INSURANCE: &str = "insurance";
}

pub const DEFAULT_AGE: f64 = 50.0;
pub const DEFAULT_GCS: f64 = 15.0;
pub const DEFAULT_SBP: f64 = 120.0;
pub const DEFAULT_HR: f64 = 75.0;
pub const DEFAULT_RR: f64 = 16.0;
pub const DEFAULT_HEIGHT_IN: f64 = 68.0;
pub const DEFAULT_WEIGHT_LB: f64 = 170.0;

/// Imperial BMI conversion factor (lb/in² to kg/m²).
const BMI_FACTOR: f64 = 703.0;

/// Single value collected from the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
    Null,
    /// Booleans, arrays, and objects; never usable, always reported.
    Other(serde_json::Value),
}

impl InputValue {
    fn is_blank(&self) -> bool {
        match self {
            InputValue::Null => true,
            InputValue::Text(text) => text.trim().is_empty(),
            InputValue::Number(_) | InputValue::Other(_) => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            InputValue::Number(number) => number.to_string(),
            InputValue::Text(text) => text.clone(),
            InputValue::Null => "null".to_string(),
            InputValue::Other(value) => value.to_string(),
        }
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for InputValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Field name → raw value mapping handed over by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInputs(BTreeMap<String, InputValue>);

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `field` and returns the mapping.
    pub fn with(mut self, field: &str, value: impl Into<InputValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<InputValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&InputValue> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, InputValue)> for RawInputs {
    fn from_iter<I: IntoIterator<Item = (String, InputValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Closed option set for a categorical form field.
pub trait Categorical: Sized + Copy + PartialEq + 'static {
    const FIELD: &'static str;
    const DEFAULT: Self;

    fn variants() -> &'static [Self];

    /// Option label as shown on the form.
    fn label(self) -> &'static str;

    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// Matches a label or alias, ignoring surrounding whitespace and ASCII case.
    fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::variants().iter().copied().find(|variant| {
            variant.label().eq_ignore_ascii_case(needle)
                || variant
                    .aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(needle))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Categorical for Sex {
    const FIELD: &'static str = field::SEX;
    const DEFAULT: Self = Sex::Male;

    fn variants() -> &'static [Self] {
        &[Sex::Male, Sex::Female]
    }

    fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractureSite {
    Other,
    HipFemur,
    Axial,
    Both,
}

impl Categorical for FractureSite {
    const FIELD: &'static str = field::FRACTURE_SITE;
    const DEFAULT: Self = FractureSite::Other;

    fn variants() -> &'static [Self] {
        &[
            FractureSite::Other,
            FractureSite::HipFemur,
            FractureSite::Axial,
            FractureSite::Both,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            FractureSite::Other => "Other",
            FractureSite::HipFemur => "Hip/Femur",
            FractureSite::Axial => "Axial (Spine/Rib/Pelvis)",
            FractureSite::Both => "Both",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            FractureSite::HipFemur => &["Hip-Femur"],
            FractureSite::Axial => &["Axial"],
            FractureSite::Other | FractureSite::Both => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    Fall,
    Mvc,
    Assault,
    Other,
}

impl Categorical for Mechanism {
    const FIELD: &'static str = field::MECHANISM;
    const DEFAULT: Self = Mechanism::Fall;

    fn variants() -> &'static [Self] {
        &[
            Mechanism::Fall,
            Mechanism::Mvc,
            Mechanism::Assault,
            Mechanism::Other,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Mechanism::Fall => "Fall",
            Mechanism::Mvc => "MVC",
            Mechanism::Assault => "Assault",
            Mechanism::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    AmbulanceAir,
    PrivateVehicle,
    WalkIn,
    Other,
}

impl Categorical for Transport {
    const FIELD: &'static str = field::TRANSPORT;
    const DEFAULT: Self = Transport::AmbulanceAir;

    fn variants() -> &'static [Self] {
        &[
            Transport::AmbulanceAir,
            Transport::PrivateVehicle,
            Transport::WalkIn,
            Transport::Other,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Transport::AmbulanceAir => "Ambulance/Air",
            Transport::PrivateVehicle => "Private Vehicle",
            Transport::WalkIn => "Walk-in",
            Transport::Other => "Other",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Transport::AmbulanceAir => &["Ambulance-Air"],
            Transport::PrivateVehicle => &["Private-Vehicle"],
            Transport::WalkIn | Transport::Other => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insurance {
    SelfPay,
    Medicare,
    Medicaid,
    Private,
    Charity,
    Other,
}

impl Categorical for Insurance {
    const FIELD: &'static str = field::INSURANCE;
    const DEFAULT: Self = Insurance::SelfPay;

    fn variants() -> &'static [Self] {
        &[
            Insurance::SelfPay,
            Insurance::Medicare,
            Insurance::Medicaid,
            Insurance::Private,
            Insurance::Charity,
            Insurance::Other,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Insurance::SelfPay => "Self-pay",
            Insurance::Medicare => "Medicare",
            Insurance::Medicaid => "Medicaid",
            Insurance::Private => "Private",
            Insurance::Charity => "Charity",
            Insurance::Other => "Other",
        }
    }
}

/// Categorical field value; unrecognized text is kept verbatim and never matches a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Choice<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: Categorical> Choice<T> {
    pub fn is(&self, value: T) -> bool {
        matches!(self, Choice::Known(known) if *known == value)
    }

    pub fn is_any(&self, values: &[T]) -> bool {
        values.iter().any(|value| self.is(*value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiSource {
    Supplied,
    Derived,
}

/// Normalized inputs with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub age: f64,
    pub sex: Choice<Sex>,
    pub gcs: f64,
    pub sbp: f64,
    pub hr: f64,
    pub rr: f64,
    pub height_in: f64,
    pub weight_lb: f64,
    pub bmi: f64,
    pub bmi_source: BmiSource,
    pub fracture_site: Choice<FractureSite>,
    pub mechanism: Choice<Mechanism>,
    pub transport: Choice<Transport>,
    pub insurance: Choice<Insurance>,
}

impl Default for PatientRecord {
    fn default() -> Self {
        normalize(&RawInputs::new()).0
    }
}

/// Fallback applied to a supplied value that could not be used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputWarning {
    pub field: String,
    pub received: String,
    pub fallback: String,
}

pub fn derive_bmi(weight_lb: f64, height_in: f64) -> f64 {
    weight_lb / height_in.powi(2) * BMI_FACTOR
}

/// Applies defaults and coercions, returning the record and any fallbacks taken.
pub fn normalize(inputs: &RawInputs) -> (PatientRecord, Vec<InputWarning>) {
    let mut normalizer = Normalizer {
        inputs,
        warnings: Vec::new(),
    };

    let age = normalizer.number(field::AGE, DEFAULT_AGE);
    let sex = normalizer.choice::<Sex>();
    let gcs = normalizer.number(field::GCS, DEFAULT_GCS);
    let sbp = normalizer.number(field::SBP, DEFAULT_SBP);
    let hr = normalizer.number(field::HR, DEFAULT_HR);
    let rr = normalizer.number(field::RR, DEFAULT_RR);
    let height_in = normalizer.positive(field::HEIGHT_IN, DEFAULT_HEIGHT_IN);
    let weight_lb = normalizer.positive(field::WEIGHT_LB, DEFAULT_WEIGHT_LB);

    let (bmi, bmi_source) =
        match normalizer.read_number(field::BMI, |value| value > 0.0, || {
            "derived from height and weight".to_string()
        }) {
            Some(bmi) => (bmi, BmiSource::Supplied),
            None => (normalizer.derived_bmi(weight_lb, height_in), BmiSource::Derived),
        };

    let record = PatientRecord {
        age,
        sex,
        gcs,
        sbp,
        hr,
        rr,
        height_in,
        weight_lb,
        bmi,
        bmi_source,
        fracture_site: normalizer.choice(),
        mechanism: normalizer.choice(),
        transport: normalizer.choice(),
        insurance: normalizer.choice(),
    };

    (record, normalizer.warnings)
}

struct Normalizer<'a> {
    inputs: &'a RawInputs,
    warnings: Vec<InputWarning>,
}

impl Normalizer<'_> {
    fn number(&mut self, field: &'static str, default: f64) -> f64 {
        self.read_number(field, |_| true, || format!("default {default}"))
            .unwrap_or(default)
    }

    fn positive(&mut self, field: &'static str, default: f64) -> f64 {
        self.read_number(field, |value| value > 0.0, || format!("default {default}"))
            .unwrap_or(default)
    }

    /// Extreme height or weight can overflow the ratio; the defaults stand in then.
    fn derived_bmi(&mut self, weight_lb: f64, height_in: f64) -> f64 {
        let bmi = derive_bmi(weight_lb, height_in);
        if bmi.is_finite() {
            return bmi;
        }
        self.reject(
            field::BMI,
            bmi.to_string(),
            "derived from default height and weight".to_string(),
        );
        derive_bmi(DEFAULT_WEIGHT_LB, DEFAULT_HEIGHT_IN)
    }

    /// `None` when the field is absent, blank, or rejected.
    fn read_number(
        &mut self,
        field: &'static str,
        accept: impl Fn(f64) -> bool,
        fallback: impl FnOnce() -> String,
    ) -> Option<f64> {
        let value = self.inputs.get(field)?;
        if value.is_blank() {
            return None;
        }

        let parsed = match value {
            InputValue::Number(number) => Some(*number),
            InputValue::Text(text) => text.trim().parse::<f64>().ok(),
            InputValue::Null | InputValue::Other(_) => None,
        };

        match parsed {
            Some(number) if number.is_finite() && accept(number) => Some(number),
            _ => {
                self.reject(field, value.describe(), fallback());
                None
            }
        }
    }

    fn choice<T: Categorical>(&mut self) -> Choice<T> {
        let raw = match self.inputs.get(T::FIELD) {
            None => return Choice::Known(T::DEFAULT),
            Some(value) if value.is_blank() => return Choice::Known(T::DEFAULT),
            Some(value) => value.describe(),
        };

        match T::parse(&raw) {
            Some(known) => Choice::Known(known),
            None => {
                self.reject(
                    T::FIELD,
                    raw.clone(),
                    "no rule on this field applies".to_string(),
                );
                Choice::Unrecognized(raw)
            }
        }
    }

    fn reject(&mut self, field: &'static str, received: String, fallback: String) {
        warn!(field, %received, %fallback, "input value not usable");
        self.warnings.push(InputWarning {
            field: field.to_string(),
            received,
            fallback,
        });
    }
}
