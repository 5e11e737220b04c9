//! Plain-text and JSON rendering of the output region for the headless command.

use serde::Serialize;

use crate::app::predict::OutputRegion;
use crate::domain::{ChurnLabel, FeatureRecord, FEATURE_NAMES};

/// JSON shape printed by `churn predict --json`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    /// `stay`, `churn`, `invalid_input`, `unavailable` or `empty`.
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<FeatureRecord>,
}

impl PredictionReport {
    pub fn from_output(output: &OutputRegion) -> Self {
        let outcome = match output {
            OutputRegion::Empty => "empty",
            OutputRegion::Outcome(o) => match o.label {
                ChurnLabel::Stay => "stay",
                ChurnLabel::Churn => "churn",
            },
            OutputRegion::InvalidInput(_) => "invalid_input",
            OutputRegion::Unavailable(_) => "unavailable",
        };
        let found = output.outcome();
        Self {
            outcome,
            label: found.map(|o| o.label.class()),
            message: output.message(),
            note: found.and_then(|o| o.cltv_note.clone()),
            record: found.map(|o| o.record),
        }
    }
}

/// Render the output region as terminal text.
pub fn format_output(output: &OutputRegion) -> String {
    let mut out = output.message().unwrap_or_default();
    if let Some(note) = output.outcome().and_then(|o| o.cltv_note.as_deref()) {
        out.push_str(&format!("\nnote: {note}"));
    }
    out
}

/// Render a record as aligned `name = value` lines in model column order.
pub fn format_record(record: &FeatureRecord) -> String {
    let width = FEATURE_NAMES.iter().map(|n| n.len()).max().unwrap_or(0);
    let values = [
        record.age.to_string(),
        record.married.to_string(),
        record.dependents.to_string(),
        record.number_of_referrals.to_string(),
        record.tenure_in_months.to_string(),
        record.internet_service.to_string(),
        record.online_security.to_string(),
        record.premium_tech_support.to_string(),
        format!("{:.2}", record.monthly_charge),
        record.satisfaction_score.to_string(),
        record.cltv.to_string(),
        record.credit_card().to_string(),
        record.mailed_check().to_string(),
    ];

    FEATURE_NAMES
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{name:<width$} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
