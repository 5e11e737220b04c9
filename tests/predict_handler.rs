//! Integration tests: the trigger handler against the bundled forest.

use std::path::PathBuf;
use std::sync::Arc;

use churn_predictor::app::predict::{on_predict, OutputRegion, Severity};
use churn_predictor::domain::{ChurnLabel, CltvEncoding};
use churn_predictor::form::{ControlId, ControlState};
use churn_predictor::io::read_model_json;
use churn_predictor::models::{ChurnModel, SharedModel};

fn bundled_model() -> SharedModel {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/rf.json");
    Arc::new(read_model_json(&path).expect("bundled model should load"))
}

fn predict(model: &dyn ChurnModel, controls: &ControlState) -> OutputRegion {
    on_predict(1, controls, model, CltvEncoding::Truncate)
}

/// The untouched form is a long-tenured, satisfied customer.
#[test]
fn default_form_predicts_stay() {
    let model = bundled_model();
    let output = predict(&*model, &ControlState::default());

    assert_eq!(output.message().as_deref(), Some("Customer is likely to Stay"));
    assert_eq!(output.severity(), Some(Severity::Success));

    let record = output.outcome().unwrap().record;
    assert_eq!((record.credit_card(), record.mailed_check()), (1, 0));
}

/// Switching to Mailed Check flips the one-hot pair but not the verdict.
#[test]
fn mailed_check_encodes_and_still_stays() {
    let model = bundled_model();
    let controls = ControlState::default().with(ControlId::PaymentMethod, "Mailed Check");
    let output = predict(&*model, &controls);

    let outcome = output.outcome().expect("expected a prediction");
    assert_eq!(outcome.label, ChurnLabel::Stay);
    assert_eq!(outcome.record.credit_card(), 0);
    assert_eq!(outcome.record.mailed_check(), 1);
}

#[test]
fn unhappy_customer_predicts_churn() {
    let model = bundled_model();
    let controls = ControlState::default().with(ControlId::Satisfaction, "1");
    let output = predict(&*model, &controls);

    assert_eq!(output.message().as_deref(), Some("Customer is likely to Churn"));
    assert_eq!(output.severity(), Some(Severity::Danger));
}

#[test]
fn new_expensive_customer_without_referrals_churns() {
    let model = bundled_model();
    let controls = ControlState::default()
        .with(ControlId::Referrals, "0")
        .with(ControlId::Tenure, "2")
        .with(ControlId::MonthlyCharges, "99.90")
        .with(ControlId::PaymentMethod, "Mailed Check");

    let output = predict(&*model, &controls);
    assert_eq!(output.outcome().map(|o| o.label), Some(ChurnLabel::Churn));
}

#[test]
fn non_numeric_charges_are_invalid_input() {
    let model = bundled_model();
    let controls = ControlState::default().with(ControlId::MonthlyCharges, "abc");
    let output = predict(&*model, &controls);

    let OutputRegion::InvalidInput(err) = &output else {
        panic!("expected invalid input, got {output:?}");
    };
    assert_eq!(err.label, "Monthly Charges");
    assert!(output.message().unwrap().starts_with("Invalid input: "));
    assert_eq!(output.severity(), Some(Severity::Warning));
}

#[test]
fn untriggered_form_stays_empty() {
    let model = bundled_model();
    let controls = ControlState::default().with(ControlId::Age, "");
    let output = on_predict(0, &controls, &*model, CltvEncoding::Truncate);
    assert_eq!(output, OutputRegion::Empty);
}

#[test]
fn shared_model_is_usable_across_threads() {
    let model = bundled_model();
    let handles: Vec<_> = ["Credit Card", "Mailed Check"]
        .into_iter()
        .map(|payment| {
            let model = Arc::clone(&model);
            std::thread::spawn(move || {
                let controls = ControlState::default().with(ControlId::PaymentMethod, payment);
                predict(&*model, &controls)
            })
        })
        .collect();

    for handle in handles {
        let output = handle.join().unwrap();
        assert_eq!(output.outcome().map(|o| o.label), Some(ChurnLabel::Stay));
    }
}
