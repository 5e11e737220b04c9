//! Convert control text into a typed `FeatureRecord`.
//!
//! Every control is parsed explicitly; the first failure (in display order) is
//! returned as a `FieldError` naming the control and the offending text.

use crate::domain::{FeatureRecord, PaymentMethod};
use crate::error::{FieldError, FieldErrorReason};
use crate::form::{ControlId, ControlKind, ControlState};

/// Validate the whole form.
pub fn validate(state: &ControlState) -> Result<FeatureRecord, FieldError> {
    Ok(FeatureRecord {
        age: count(state, ControlId::Age)?,
        married: flag(state, ControlId::Married)?,
        dependents: flag(state, ControlId::Dependents)?,
        number_of_referrals: count(state, ControlId::Referrals)?,
        tenure_in_months: count(state, ControlId::Tenure)?,
        internet_service: flag(state, ControlId::InternetService)?,
        online_security: flag(state, ControlId::OnlineSecurity)?,
        premium_tech_support: flag(state, ControlId::TechSupport)?,
        monthly_charge: amount(state, ControlId::MonthlyCharges)?,
        satisfaction_score: bounded(state, ControlId::Satisfaction, 1, 5)?,
        cltv: amount(state, ControlId::Cltv)?,
        payment_method: payment(state, ControlId::PaymentMethod)?,
    })
}

fn fail(id: ControlId, value: &str, reason: FieldErrorReason) -> FieldError {
    FieldError {
        label: id.label(),
        value: value.to_string(),
        reason,
    }
}

fn non_empty(state: &ControlState, id: ControlId) -> Result<&str, FieldError> {
    let raw = state.get(id);
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(fail(id, raw, FieldErrorReason::Empty));
    }
    Ok(trimmed)
}

fn integer(state: &ControlState, id: ControlId) -> Result<i64, FieldError> {
    let text = non_empty(state, id)?;
    text.parse::<i64>().map_err(|_| {
        // "2.5" is a number, just not a whole one.
        let reason = match text.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => FieldErrorReason::NotPlainInteger,
            Ok(_) => FieldErrorReason::NotInteger,
            Err(_) => FieldErrorReason::NotNumber,
        };
        fail(id, text, reason)
    })
}

/// Non-negative whole number.
fn count(state: &ControlState, id: ControlId) -> Result<u32, FieldError> {
    let value = integer(state, id)?;
    if value < 0 {
        return Err(fail(id, state.get(id).trim(), FieldErrorReason::BelowMinimum { min: 0 }));
    }
    u32::try_from(value).map_err(|_| {
        fail(
            id,
            state.get(id).trim(),
            FieldErrorReason::OutOfRange {
                min: 0,
                max: i64::from(u32::MAX),
            },
        )
    })
}

fn bounded(state: &ControlState, id: ControlId, min: u8, max: u8) -> Result<u8, FieldError> {
    let value = integer(state, id)?;
    if value < i64::from(min) || value > i64::from(max) {
        return Err(fail(
            id,
            state.get(id).trim(),
            FieldErrorReason::OutOfRange {
                min: i64::from(min),
                max: i64::from(max),
            },
        ));
    }
    // In range, so the cast is lossless.
    Ok(value as u8)
}

fn flag(state: &ControlState, id: ControlId) -> Result<u8, FieldError> {
    bounded(state, id, 0, 1)
}

/// Non-negative finite decimal.
fn amount(state: &ControlState, id: ControlId) -> Result<f64, FieldError> {
    let text = non_empty(state, id)?;
    let value = text
        .parse::<f64>()
        .map_err(|_| fail(id, text, FieldErrorReason::NotNumber))?;
    if !value.is_finite() {
        return Err(fail(id, text, FieldErrorReason::NotFinite));
    }
    if value < 0.0 {
        return Err(fail(id, text, FieldErrorReason::BelowMinimum { min: 0 }));
    }
    Ok(value)
}

fn payment(state: &ControlState, id: ControlId) -> Result<PaymentMethod, FieldError> {
    let text = non_empty(state, id)?;
    PaymentMethod::from_display_name(text).ok_or_else(|| {
        let allowed = match id.kind() {
            ControlKind::Choice(options) => options
                .iter()
                .map(|c| c.value)
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        };
        fail(id, text, FieldErrorReason::NotAnOption { allowed })
    })
}
