use crate::scoring::input::{
    derive_bmi, field, normalize, BmiSource, Categorical, Choice, FractureSite, InputValue,
    Insurance, Mechanism, RawInputs, Sex, Transport, DEFAULT_HEIGHT_IN, DEFAULT_WEIGHT_LB,
};

#[test]
fn missing_fields_take_documented_defaults() {
    let (record, warnings) = normalize(&RawInputs::new());

    assert_eq!(record.age, 50.0);
    assert_eq!(record.sex, Choice::Known(Sex::Male));
    assert_eq!(record.gcs, 15.0);
    assert_eq!(record.sbp, 120.0);
    assert_eq!(record.hr, 75.0);
    assert_eq!(record.rr, 16.0);
    assert_eq!(record.height_in, 68.0);
    assert_eq!(record.weight_lb, 170.0);
    assert_eq!(record.fracture_site, Choice::Known(FractureSite::Other));
    assert_eq!(record.mechanism, Choice::Known(Mechanism::Fall));
    assert_eq!(record.transport, Choice::Known(Transport::AmbulanceAir));
    assert_eq!(record.insurance, Choice::Known(Insurance::SelfPay));
    assert_eq!(record.bmi_source, BmiSource::Derived);
    assert_eq!(record.bmi, derive_bmi(DEFAULT_WEIGHT_LB, DEFAULT_HEIGHT_IN));
    assert!(warnings.is_empty());
}

#[test]
fn bmi_is_derived_from_imperial_units() {
    let bmi = derive_bmi(300.0, 68.0);
    assert!((bmi - 45.61).abs() < 0.01, "bmi was {bmi}");
}

#[test]
fn supplied_bmi_wins_over_height_and_weight() {
    let inputs = RawInputs::new()
        .with(field::BMI, 41.5)
        .with(field::HEIGHT_IN, 70)
        .with(field::WEIGHT_LB, 150);

    let (record, warnings) = normalize(&inputs);

    assert_eq!(record.bmi, 41.5);
    assert_eq!(record.bmi_source, BmiSource::Supplied);
    assert!(warnings.is_empty());
}

#[test]
fn numeric_text_is_coerced() {
    let inputs = RawInputs::new()
        .with(field::AGE, " 82 ")
        .with(field::GCS, "9");

    let (record, warnings) = normalize(&inputs);

    assert_eq!(record.age, 82.0);
    assert_eq!(record.gcs, 9.0);
    assert!(warnings.is_empty());
}

#[test]
fn blank_and_null_values_are_treated_as_missing() {
    let mut inputs = RawInputs::new().with(field::AGE, "   ");
    inputs.insert(field::SEX, InputValue::Null);
    inputs.insert(field::INSURANCE, "");

    let (record, warnings) = normalize(&inputs);

    assert_eq!(record.age, 50.0);
    assert_eq!(record.sex, Choice::Known(Sex::Male));
    assert_eq!(record.insurance, Choice::Known(Insurance::SelfPay));
    assert!(warnings.is_empty());
}

#[test]
fn unparseable_numbers_fall_back_with_warning() {
    let inputs = RawInputs::new()
        .with(field::SBP, "low")
        .with(field::HR, f64::NAN);

    let (record, warnings) = normalize(&inputs);

    assert_eq!(record.sbp, 120.0);
    assert_eq!(record.hr, 75.0);
    let fields: Vec<&str> = warnings.iter().map(|w| w.field.as_str()).collect();
    assert_eq!(fields, vec!["sbp", "hr"]);
    assert_eq!(warnings[0].received, "low");
    assert_eq!(warnings[0].fallback, "default 120");
}

#[test]
fn non_positive_height_keeps_bmi_finite() {
    let inputs = RawInputs::new()
        .with(field::HEIGHT_IN, 0)
        .with(field::WEIGHT_LB, 300);

    let (record, warnings) = normalize(&inputs);

    assert_eq!(record.height_in, DEFAULT_HEIGHT_IN);
    assert!(record.bmi.is_finite());
    assert!(record.bmi >= 40.0);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "height_in");
}

#[test]
fn invalid_direct_bmi_falls_back_to_derivation() {
    let inputs = RawInputs::new().with(field::BMI, -3);

    let (record, warnings) = normalize(&inputs);

    assert_eq!(record.bmi_source, BmiSource::Derived);
    assert_eq!(warnings[0].fallback, "derived from height and weight");
}

#[test]
fn categorical_labels_and_aliases_are_recognized() {
    assert_eq!(FractureSite::parse("Hip/Femur"), Some(FractureSite::HipFemur));
    assert_eq!(FractureSite::parse("hip-femur"), Some(FractureSite::HipFemur));
    assert_eq!(
        FractureSite::parse("Axial (Spine/Rib/Pelvis)"),
        Some(FractureSite::Axial)
    );
    assert_eq!(FractureSite::parse("Axial"), Some(FractureSite::Axial));
    assert_eq!(Transport::parse("Ambulance-Air"), Some(Transport::AmbulanceAir));
    assert_eq!(Transport::parse("private-vehicle"), Some(Transport::PrivateVehicle));
    assert_eq!(Transport::parse("Walk-in"), Some(Transport::WalkIn));
    assert_eq!(Insurance::parse("self-pay"), Some(Insurance::SelfPay));
    assert_eq!(Mechanism::parse("mvc"), Some(Mechanism::Mvc));
    assert_eq!(Sex::parse("F"), None);
}

#[test]
fn unrecognized_categories_are_kept_verbatim() {
    let inputs = RawInputs::new()
        .with(field::SEX, "F")
        .with(field::MECHANISM, 3);

    let (record, warnings) = normalize(&inputs);

    assert_eq!(record.sex, Choice::Unrecognized("F".to_string()));
    assert_eq!(record.mechanism, Choice::Unrecognized("3".to_string()));
    assert!(!record.sex.is(Sex::Male));
    assert!(!record.sex.is(Sex::Female));
    assert_eq!(warnings.len(), 2);
}

#[test]
fn raw_inputs_deserialize_from_mixed_json() {
    let inputs: RawInputs = serde_json::from_str(
        r#"{"age": 77, "sex": "Female", "gcs": "14", "insurance": null}"#,
    )
    .expect("inputs parse");

    assert_eq!(inputs.len(), 4);
    assert_eq!(inputs.get("age"), Some(&InputValue::Number(77.0)));
    assert_eq!(inputs.get("gcs"), Some(&InputValue::Text("14".to_string())));
    assert_eq!(inputs.get("insurance"), Some(&InputValue::Null));
}

#[test]
fn underflowing_height_falls_back_to_default_bmi() {
    let inputs = RawInputs::new().with(field::HEIGHT_IN, 1e-200);

    let (record, warnings) = normalize(&inputs);

    assert!(record.bmi.is_finite());
    assert_eq!(record.bmi, derive_bmi(DEFAULT_WEIGHT_LB, DEFAULT_HEIGHT_IN));
    assert_eq!(record.bmi_source, BmiSource::Derived);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "bmi");
    assert_eq!(warnings[0].received, "inf");
}

#[test]
fn non_scalar_json_values_are_kept_and_reported() {
    let inputs: RawInputs = serde_json::from_str(
        r#"{"age": true, "gcs": [7], "sex": {"value": "Female"}}"#,
    )
    .expect("inputs parse");

    let (record, warnings) = normalize(&inputs);

    assert_eq!(record.age, 50.0);
    assert_eq!(record.gcs, 15.0);
    assert!(matches!(record.sex, Choice::Unrecognized(_)));
    let fields: Vec<&str> = warnings.iter().map(|w| w.field.as_str()).collect();
    assert_eq!(fields, vec!["age", "sex", "gcs"]);
    assert_eq!(warnings[0].received, "true");
}
