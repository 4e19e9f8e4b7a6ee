//! Input form description served to front-ends.

use serde::Serialize;

use super::catalog::MODEL_NAME;
use super::input::{
    field, Categorical, FractureSite, Insurance, Mechanism, Sex, Transport, DEFAULT_AGE,
    DEFAULT_GCS, DEFAULT_HR, DEFAULT_RR, DEFAULT_SBP,
};

const DEFAULT_FORM_BMI: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub model_name: &'static str,
    pub groups: Vec<FieldGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGroup {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Continuous {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    Categorical {
        options: Vec<&'static str>,
        default: &'static str,
    },
}

impl FormSchema {
    pub fn ford() -> Self {
        Self {
            model_name: MODEL_NAME,
            groups: vec![
                FieldGroup {
                    name: "Patient Demographics",
                    fields: vec![
                        continuous(field::AGE, "Age (years)", 18.0, 110.0, 1.0, DEFAULT_AGE),
                        categorical::<Sex>("Sex"),
                        continuous(
                            field::BMI,
                            "BMI (kg/m\u{b2})",
                            10.0,
                            80.0,
                            0.1,
                            DEFAULT_FORM_BMI,
                        ),
                    ],
                },
                FieldGroup {
                    name: "ED Vital Signs",
                    fields: vec![
                        continuous(
                            field::GCS,
                            "Glasgow Coma Scale (3-15)",
                            3.0,
                            15.0,
                            1.0,
                            DEFAULT_GCS,
                        ),
                        continuous(
                            field::SBP,
                            "Systolic Blood Pressure (mmHg)",
                            40.0,
                            260.0,
                            1.0,
                            DEFAULT_SBP,
                        ),
                        continuous(
                            field::HR,
                            "Heart Rate (bpm)",
                            20.0,
                            220.0,
                            1.0,
                            DEFAULT_HR,
                        ),
                        continuous(
                            field::RR,
                            "Respiratory Rate (breaths/min)",
                            4.0,
                            50.0,
                            1.0,
                            DEFAULT_RR,
                        ),
                    ],
                },
                FieldGroup {
                    name: "Injury Characteristics",
                    fields: vec![
                        categorical::<FractureSite>("Fracture Site"),
                        categorical::<Mechanism>("Mechanism of Injury"),
                    ],
                },
                FieldGroup {
                    name: "Prehospital & Insurance",
                    fields: vec![
                        categorical::<Transport>("Transport Mode"),
                        categorical::<Insurance>("Insurance"),
                    ],
                },
            ],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.groups
            .iter()
            .flat_map(|group| group.fields.iter())
            .find(|spec| spec.name == name)
    }
}

fn continuous(
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    step: f64,
    default: f64,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Continuous {
            min,
            max,
            step,
            default,
        },
    }
}

fn categorical<T: Categorical>(label: &'static str) -> FieldSpec {
    FieldSpec {
        name: T::FIELD,
        label,
        kind: FieldKind::Categorical {
            options: T::variants().iter().map(|variant| variant.label()).collect(),
            default: T::DEFAULT.label(),
        },
    }
}
