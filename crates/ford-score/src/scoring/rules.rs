use super::catalog::PredicateRule;
use super::input::{FractureSite, Insurance, Mechanism, PatientRecord, Sex, Transport};
use super::ScoreComponent;

pub(crate) fn ford_rules() -> Vec<PredicateRule> {
    vec![
        rule("gcs_severe", "GCS Severe", "GCS ≤ 8", 6, |p| p.gcs <= 8.0),
        rule(
            "hip_femur_fracture",
            "Hip/Femur Fracture",
            "Fracture site is Hip/Femur or Both",
            5,
            |p| {
                p.fracture_site
                    .is_any(&[FractureSite::HipFemur, FractureSite::Both])
            },
        ),
        rule("resp_rate_low", "Resp Rate Low", "RR < 12", 5, |p| {
            p.rr < 12.0
        }),
        rule(
            "insurance_medicare",
            "Insurance: Medicare",
            "Insurance = Medicare",
            4,
            |p| p.insurance.is(Insurance::Medicare),
        ),
        rule("sbp_hypotensive", "SBP Hypotensive", "SBP < 90", 4, |p| {
            p.sbp < 90.0
        }),
        rule(
            "insurance_other",
            "Insurance: Other",
            "Insurance = Other",
            4,
            |p| p.insurance.is(Insurance::Other),
        ),
        rule("age_75_plus", "Age ≥ 75", "Age ≥ 75", 3, |p| p.age >= 75.0),
        rule(
            "axial_fracture",
            "Axial Fracture",
            "Fracture site is Axial or Both",
            3,
            |p| {
                p.fracture_site
                    .is_any(&[FractureSite::Axial, FractureSite::Both])
            },
        ),
        rule(
            "insurance_private",
            "Insurance: Private",
            "Insurance = Private",
            3,
            |p| p.insurance.is(Insurance::Private),
        ),
        rule(
            "insurance_charity",
            "Insurance: Charity",
            "Insurance = Charity",
            3,
            |p| p.insurance.is(Insurance::Charity),
        ),
        rule("gcs_moderate", "GCS Moderate", "9 ≤ GCS ≤ 12", 3, |p| {
            (9.0..=12.0).contains(&p.gcs)
        }),
        rule("bmi_40_plus", "BMI ≥ 40", "BMI ≥ 40", 2, |p| p.bmi >= 40.0),
        rule("age_65_to_74", "Age 65–74", "65 ≤ Age ≤ 74", 1, |p| {
            (65.0..=74.0).contains(&p.age)
        }),
        rule("female", "Female", "Sex = Female", 1, |p| p.sex.is(Sex::Female)),
        rule("resp_rate_high", "Resp Rate High", "RR > 20", 1, |p| {
            p.rr > 20.0
        }),
        rule("hr_tachycardic", "HR Tachycardic", "HR ≥ 100", 1, |p| {
            p.hr >= 100.0
        }),
        rule(
            "transport_private_vehicle",
            "Transport: Private Vehicle",
            "Transport = Private Vehicle",
            -2,
            |p| p.transport.is(Transport::PrivateVehicle),
        ),
        rule(
            "mechanism_assault",
            "Mechanism: Assault",
            "Mechanism = Assault",
            -3,
            |p| p.mechanism.is(Mechanism::Assault),
        ),
        rule(
            "transport_walk_in",
            "Transport: Walk-in",
            "Transport = Walk-in",
            -4,
            |p| p.transport.is(Transport::WalkIn),
        ),
    ]
}

fn rule(
    key: &'static str,
    label: &'static str,
    condition: &'static str,
    points: i32,
    predicate: fn(&PatientRecord) -> bool,
) -> PredicateRule {
    PredicateRule {
        key,
        label,
        condition,
        points,
        predicate,
    }
}

/// Evaluates each rule on its own and sums the signed values; no clamping here.
pub(crate) fn evaluate_rules(
    rules: &[PredicateRule],
    record: &PatientRecord,
) -> (Vec<ScoreComponent>, i32) {
    let mut components = Vec::with_capacity(rules.len());
    let mut raw_score: i32 = 0;

    for rule in rules {
        let met = rule.evaluate(record);
        let value = if met { rule.points } else { 0 };
        raw_score += value;

        components.push(ScoreComponent {
            key: rule.key,
            label: rule.label,
            condition: rule.condition,
            met,
            points: rule.points,
            value,
        });
    }

    (components, raw_score)
}
