//! Form model: the twelve input controls and their current values.
//!
//! The form is a plain value type so it can be edited by the terminal UI, built
//! from CLI flags, or constructed directly in tests. It performs no validation;
//! converting control text into a `FeatureRecord` lives in `validate`.

use crate::domain::{FeatureRecord, PaymentMethod};

pub mod validate;

pub use validate::validate;

/// One selectable option of a choice control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub label: &'static str,
    pub value: &'static str,
}

const YES_NO: &[Choice] = &[
    Choice { label: "Yes", value: "1" },
    Choice { label: "No", value: "0" },
];

const SATISFACTION: &[Choice] = &[
    Choice { label: "1", value: "1" },
    Choice { label: "2", value: "2" },
    Choice { label: "3", value: "3" },
    Choice { label: "4", value: "4" },
    Choice { label: "5", value: "5" },
];

const PAYMENT: &[Choice] = &[
    Choice { label: "Credit Card", value: "Credit Card" },
    Choice { label: "Mailed Check", value: "Mailed Check" },
];

/// How a control accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Numeric text box; only digits, sign and decimal point can be typed.
    Number,
    /// Free text box; any printable character is accepted.
    Text,
    /// Closed list of options.
    Choice(&'static [Choice]),
}

/// The form's controls, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Age,
    Married,
    Dependents,
    Referrals,
    Tenure,
    InternetService,
    OnlineSecurity,
    TechSupport,
    MonthlyCharges,
    Satisfaction,
    Cltv,
    PaymentMethod,
}

impl ControlId {
    pub const COUNT: usize = 12;

    pub const ALL: [ControlId; Self::COUNT] = [
        ControlId::Age,
        ControlId::Married,
        ControlId::Dependents,
        ControlId::Referrals,
        ControlId::Tenure,
        ControlId::InternetService,
        ControlId::OnlineSecurity,
        ControlId::TechSupport,
        ControlId::MonthlyCharges,
        ControlId::Satisfaction,
        ControlId::Cltv,
        ControlId::PaymentMethod,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlId::Age => "Age",
            ControlId::Married => "Married",
            ControlId::Dependents => "Dependents",
            ControlId::Referrals => "Number of Referrals",
            ControlId::Tenure => "Tenure in Months",
            ControlId::InternetService => "Internet Services",
            ControlId::OnlineSecurity => "Online Security",
            ControlId::TechSupport => "Premium Tech Support",
            ControlId::MonthlyCharges => "Monthly Charges",
            ControlId::Satisfaction => "Satisfaction Score",
            ControlId::Cltv => "Customer Lifetime Value",
            ControlId::PaymentMethod => "Payment Method",
        }
    }

    /// Hint shown while the control is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            ControlId::Age => "Enter Age",
            ControlId::Referrals => "Enter # of referrals",
            ControlId::Tenure => "Enter tenure in months",
            ControlId::MonthlyCharges => "Enter monthly charges",
            ControlId::Cltv => "Enter Customer Lifetime Value",
            _ => "",
        }
    }

    pub fn kind(self) -> ControlKind {
        match self {
            ControlId::Age | ControlId::Referrals | ControlId::Tenure => ControlKind::Number,
            ControlId::MonthlyCharges | ControlId::Cltv => ControlKind::Text,
            ControlId::Married
            | ControlId::Dependents
            | ControlId::InternetService
            | ControlId::OnlineSecurity
            | ControlId::TechSupport => ControlKind::Choice(YES_NO),
            ControlId::Satisfaction => ControlKind::Choice(SATISFACTION),
            ControlId::PaymentMethod => ControlKind::Choice(PAYMENT),
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            ControlId::Age => "25",
            ControlId::Referrals => "1",
            ControlId::Tenure => "8",
            ControlId::MonthlyCharges => "20",
            ControlId::Satisfaction => "3",
            ControlId::Cltv => "2500",
            ControlId::PaymentMethod => "Credit Card",
            ControlId::Married
            | ControlId::Dependents
            | ControlId::InternetService
            | ControlId::OnlineSecurity
            | ControlId::TechSupport => "1",
        }
    }

    /// Whether `c` may be typed into this control.
    pub fn accepts_char(self, c: char) -> bool {
        match self.kind() {
            ControlKind::Number => c.is_ascii_digit() || matches!(c, '-' | '+' | '.'),
            ControlKind::Text => !c.is_control(),
            ControlKind::Choice(_) => false,
        }
    }
}

/// Current value of every control, stored as the text the control displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    values: [String; ControlId::COUNT],
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            values: ControlId::ALL.map(|id| id.default_value().to_string()),
        }
    }
}

impl ControlState {
    pub fn get(&self, id: ControlId) -> &str {
        &self.values[id.index()]
    }

    pub fn set(&mut self, id: ControlId, value: impl Into<String>) {
        self.values[id.index()] = value.into();
    }

    /// Builder-style `set`.
    pub fn with(mut self, id: ControlId, value: impl Into<String>) -> Self {
        self.set(id, value);
        self
    }

    /// Move a choice control to the next (`step > 0`) or previous option.
    ///
    /// A value that matches no option snaps to the first one. Text controls are
    /// left untouched.
    pub fn cycle(&mut self, id: ControlId, step: i32) {
        let ControlKind::Choice(options) = id.kind() else {
            return;
        };
        let len = options.len() as i32;
        let next = match options.iter().position(|c| c.value == self.get(id)) {
            Some(pos) => (pos as i32 + step.signum()).rem_euclid(len),
            None => 0,
        };
        self.set(id, options[next as usize].value);
    }

    /// Text shown for a control: the option label for choices, the raw text otherwise.
    pub fn display(&self, id: ControlId) -> &str {
        let value = self.get(id);
        match id.kind() {
            ControlKind::Choice(options) => options
                .iter()
                .find(|c| c.value == value)
                .map(|c| c.label)
                .unwrap_or(value),
            _ => value,
        }
    }

    /// Render a record back into control text.
    pub fn from_record(record: &FeatureRecord) -> Self {
        let flag = |v: u8| v.to_string();
        let mut state = Self::default();
        state.set(ControlId::Age, record.age.to_string());
        state.set(ControlId::Married, flag(record.married));
        state.set(ControlId::Dependents, flag(record.dependents));
        state.set(ControlId::Referrals, record.number_of_referrals.to_string());
        state.set(ControlId::Tenure, record.tenure_in_months.to_string());
        state.set(ControlId::InternetService, flag(record.internet_service));
        state.set(ControlId::OnlineSecurity, flag(record.online_security));
        state.set(ControlId::TechSupport, flag(record.premium_tech_support));
        state.set(ControlId::MonthlyCharges, record.monthly_charge.to_string());
        state.set(ControlId::Satisfaction, record.satisfaction_score.to_string());
        state.set(ControlId::Cltv, record.cltv.to_string());
        state.set(
            ControlId::PaymentMethod,
            record.payment_method.display_name(),
        );
        state
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        PaymentMethod::from_display_name(self.get(ControlId::PaymentMethod))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_catalogue() {
        let state = ControlState::default();
        assert_eq!(state.get(ControlId::Age), "25");
        assert_eq!(state.get(ControlId::MonthlyCharges), "20");
        assert_eq!(state.get(ControlId::Cltv), "2500");
        assert_eq!(state.get(ControlId::Satisfaction), "3");
        assert_eq!(state.display(ControlId::Married), "Yes");
        assert_eq!(state.payment_method(), Some(PaymentMethod::CreditCard));
    }

    #[test]
    fn control_order_matches_indices() {
        for (i, id) in ControlId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn cycle_wraps_in_both_directions() {
        let mut state = ControlState::default();

        state.cycle(ControlId::Satisfaction, 1);
        assert_eq!(state.get(ControlId::Satisfaction), "4");
        state.cycle(ControlId::Satisfaction, 1);
        state.cycle(ControlId::Satisfaction, 1);
        assert_eq!(state.get(ControlId::Satisfaction), "1");
        state.cycle(ControlId::Satisfaction, -1);
        assert_eq!(state.get(ControlId::Satisfaction), "5");

        state.cycle(ControlId::PaymentMethod, 1);
        assert_eq!(state.payment_method(), Some(PaymentMethod::MailedCheck));
        state.cycle(ControlId::PaymentMethod, 1);
        assert_eq!(state.payment_method(), Some(PaymentMethod::CreditCard));
    }

    #[test]
    fn cycle_snaps_unknown_values_and_ignores_text_controls() {
        let mut state = ControlState::default().with(ControlId::Married, "maybe");
        state.cycle(ControlId::Married, 1);
        assert_eq!(state.get(ControlId::Married), "1");

        state.cycle(ControlId::MonthlyCharges, 1);
        assert_eq!(state.get(ControlId::MonthlyCharges), "20");
    }

    #[test]
    fn number_controls_filter_keystrokes() {
        assert!(ControlId::Age.accepts_char('7'));
        assert!(!ControlId::Age.accepts_char('a'));
        assert!(!ControlId::Age.accepts_char('e'));
        assert!(ControlId::MonthlyCharges.accepts_char('a'));
        assert!(!ControlId::Married.accepts_char('1'));
    }
}
