//! The prediction handler shared by the terminal form and the headless command.
//!
//! It is a pure mapping from (trigger count, control state) to the contents of
//! the output region; front-ends only decide how to draw the result.
//!
//! control text -> validate -> FeatureRecord -> row -> model -> label -> message

use crate::domain::{ChurnLabel, CltvEncoding, FeatureRecord};
use crate::error::{FieldError, PredictError};
use crate::form::{validate, ControlState};
use crate::models::ChurnModel;

/// How the output region should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Customer is likely to stay.
    Success,
    /// Customer is likely to churn.
    Danger,
    /// Input needs fixing.
    Warning,
    /// The model could not answer.
    Error,
}

/// A successful trigger cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub label: ChurnLabel,
    pub record: FeatureRecord,
    /// Set when the CLTV encoding changed the value the user entered.
    pub cltv_note: Option<String>,
}

/// Contents of the output region.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutputRegion {
    /// The trigger has never fired.
    #[default]
    Empty,
    Outcome(Outcome),
    InvalidInput(FieldError),
    Unavailable(String),
}

impl OutputRegion {
    pub fn from_result(result: Result<Outcome, PredictError>) -> Self {
        match result {
            Ok(outcome) => OutputRegion::Outcome(outcome),
            Err(PredictError::InvalidInput(err)) => OutputRegion::InvalidInput(err),
            Err(PredictError::PredictionUnavailable(reason)) => OutputRegion::Unavailable(reason),
        }
    }

    /// Text to show, or `None` while the region is empty.
    pub fn message(&self) -> Option<String> {
        match self {
            OutputRegion::Empty => None,
            OutputRegion::Outcome(outcome) => Some(outcome.label.message().to_string()),
            OutputRegion::InvalidInput(err) => Some(format!("Invalid input: {err}")),
            OutputRegion::Unavailable(reason) => Some(format!("Prediction unavailable: {reason}")),
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            OutputRegion::Empty => None,
            OutputRegion::Outcome(outcome) => Some(match outcome.label {
                ChurnLabel::Stay => Severity::Success,
                ChurnLabel::Churn => Severity::Danger,
            }),
            OutputRegion::InvalidInput(_) => Some(Severity::Warning),
            OutputRegion::Unavailable(_) => Some(Severity::Error),
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            OutputRegion::Outcome(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Run one prediction from the current controls.
pub fn run_prediction(
    controls: &ControlState,
    model: &dyn ChurnModel,
    cltv: CltvEncoding,
) -> Result<Outcome, PredictError> {
    let record = validate(controls).inspect_err(|err| log::warn!("rejected input: {err}"))?;

    let cltv_note = cltv.alters(record.cltv).then(|| {
        let encoded = cltv.apply(record.cltv);
        log::warn!(
            "cltv {} truncated to {encoded} before prediction",
            record.cltv
        );
        format!("Customer lifetime value {} was truncated to {encoded}.", record.cltv)
    });

    let row = record.to_row(cltv);
    let label = model
        .predict(&row)
        .inspect_err(|err| log::error!("{err}"))?;

    log::info!(
        "prediction: {:?} (payment={}, satisfaction={}, tenure={})",
        label,
        record.payment_method.display_name(),
        record.satisfaction_score,
        record.tenure_in_months
    );

    Ok(Outcome {
        label,
        record,
        cltv_note,
    })
}

/// Handle a trigger event.
///
/// `trigger_count` is the number of times the trigger has fired, including
/// this one. While it is zero the region stays empty and nothing is validated.
pub fn on_predict(
    trigger_count: u64,
    controls: &ControlState,
    model: &dyn ChurnModel,
    cltv: CltvEncoding,
) -> OutputRegion {
    if trigger_count == 0 {
        return OutputRegion::Empty;
    }
    OutputRegion::from_result(run_prediction(controls, model, cltv))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::domain::FEATURE_COUNT;
    use crate::form::ControlId;

    /// Returns a fixed label and remembers the last row it saw.
    struct Fixed {
        label: ChurnLabel,
        last_row: Mutex<Option<[f64; FEATURE_COUNT]>>,
    }

    impl Fixed {
        fn new(label: ChurnLabel) -> Self {
            Self {
                label,
                last_row: Mutex::new(None),
            }
        }
    }

    impl ChurnModel for Fixed {
        fn predict(&self, row: &[f64; FEATURE_COUNT]) -> Result<ChurnLabel, PredictError> {
            *self.last_row.lock().unwrap() = Some(*row);
            Ok(self.label)
        }
    }

    #[test]
    fn empty_before_first_trigger_even_with_bad_input() {
        let controls = ControlState::default().with(ControlId::MonthlyCharges, "abc");
        let output = on_predict(0, &controls, &Fixed::new(ChurnLabel::Churn), CltvEncoding::Truncate);
        assert_eq!(output, OutputRegion::Empty);
        assert_eq!(output.message(), None);
        assert_eq!(output.severity(), None);
    }

    #[test]
    fn stay_label_renders_success_message() {
        let model = Fixed::new(ChurnLabel::Stay);
        let output = on_predict(1, &ControlState::default(), &model, CltvEncoding::Truncate);

        assert_eq!(output.message().as_deref(), Some("Customer is likely to Stay"));
        assert_eq!(output.severity(), Some(Severity::Success));

        let row = model.last_row.lock().unwrap().unwrap();
        assert_eq!(
            row,
            [25.0, 1.0, 1.0, 1.0, 8.0, 1.0, 1.0, 1.0, 20.0, 3.0, 2500.0, 1.0, 0.0]
        );
    }

    #[test]
    fn churn_label_renders_danger_message() {
        let output = on_predict(
            3,
            &ControlState::default(),
            &Fixed::new(ChurnLabel::Churn),
            CltvEncoding::Truncate,
        );
        assert_eq!(output.message().as_deref(), Some("Customer is likely to Churn"));
        assert_eq!(output.severity(), Some(Severity::Danger));
    }

    #[test]
    fn invalid_input_is_reported_not_raised() {
        let model = Fixed::new(ChurnLabel::Stay);
        let controls = ControlState::default().with(ControlId::MonthlyCharges, "abc");
        let output = on_predict(1, &controls, &model, CltvEncoding::Truncate);

        let OutputRegion::InvalidInput(err) = &output else {
            panic!("expected invalid input, got {output:?}");
        };
        assert_eq!(err.label, "Monthly Charges");
        assert_eq!(output.severity(), Some(Severity::Warning));
        assert!(model.last_row.lock().unwrap().is_none(), "model must not be called");
    }

    #[test]
    fn model_failure_is_unavailable() {
        struct Broken;
        impl ChurnModel for Broken {
            fn predict(&self, _row: &[f64; FEATURE_COUNT]) -> Result<ChurnLabel, PredictError> {
                Err(PredictError::PredictionUnavailable("backend offline".to_string()))
            }
        }

        let output = on_predict(1, &ControlState::default(), &Broken, CltvEncoding::Truncate);
        assert_eq!(output, OutputRegion::Unavailable("backend offline".to_string()));
        assert_eq!(
            output.message().as_deref(),
            Some("Prediction unavailable: backend offline")
        );
        assert_eq!(output.severity(), Some(Severity::Error));
    }

    #[test]
    fn fractional_cltv_is_flagged_when_truncated() {
        let controls = ControlState::default().with(ControlId::Cltv, "2500.75");

        let truncated = run_prediction(&controls, &Fixed::new(ChurnLabel::Stay), CltvEncoding::Truncate)
            .unwrap();
        assert_eq!(
            truncated.cltv_note.as_deref(),
            Some("Customer lifetime value 2500.75 was truncated to 2500.")
        );

        let model = Fixed::new(ChurnLabel::Stay);
        let exact = run_prediction(&controls, &model, CltvEncoding::Exact).unwrap();
        assert_eq!(exact.cltv_note, None);
        assert_eq!(model.last_row.lock().unwrap().unwrap()[10], 2500.75);
    }

    #[test]
    fn each_trigger_recomputes_from_current_controls() {
        // Label follows the payment method so a stale result would be visible.
        struct ByPayment {
            calls: AtomicU32,
        }
        impl ChurnModel for ByPayment {
            fn predict(&self, row: &[f64; FEATURE_COUNT]) -> Result<ChurnLabel, PredictError> {
                self.calls.fetch_add(1, Ordering::Relaxed);
                Ok(if row[12] == 1.0 { ChurnLabel::Churn } else { ChurnLabel::Stay })
            }
        }

        let model = ByPayment { calls: AtomicU32::new(0) };
        let mut controls = ControlState::default();

        let first = on_predict(1, &controls, &model, CltvEncoding::Truncate);
        controls.set(ControlId::PaymentMethod, "Mailed Check");
        let second = on_predict(2, &controls, &model, CltvEncoding::Truncate);
        controls.set(ControlId::PaymentMethod, "Credit Card");
        let third = on_predict(3, &controls, &model, CltvEncoding::Truncate);

        assert_eq!(first.outcome().unwrap().label, ChurnLabel::Stay);
        assert_eq!(second.outcome().unwrap().label, ChurnLabel::Churn);
        assert_eq!(third, first);
        assert_eq!(model.calls.load(Ordering::Relaxed), 3);
    }
}
