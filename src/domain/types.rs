//! Shared domain types.
//!
//! A `FeatureRecord` is built fresh on every trigger and never mutated; it is
//! serializable so the headless command can echo exactly what the model saw.

use clap::ValueEnum;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Number of columns in a model row.
pub const FEATURE_COUNT: usize = 13;

/// Column names in the order the model expects them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "married",
    "dependents",
    "number_of_referrals",
    "tenure_in_months",
    "internet_service",
    "online_security",
    "premium_tech_support",
    "monthly_charge",
    "satisfaction_score",
    "cltv",
    "credit_card",
    "mailed_check",
];

/// How the customer pays. Encoded as the one-hot pair `credit_card` / `mailed_check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Mailed Check")]
    MailedCheck,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::CreditCard, PaymentMethod::MailedCheck];

    /// Label shown in the form; also the value the form control stores.
    pub fn display_name(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::MailedCheck => "Mailed Check",
        }
    }

    pub fn from_display_name(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.display_name() == value)
    }

    /// `(credit_card, mailed_check)`; exactly one side is 1.
    pub fn one_hot(self) -> (u8, u8) {
        match self {
            PaymentMethod::CreditCard => (1, 0),
            PaymentMethod::MailedCheck => (0, 1),
        }
    }
}

/// How the customer-lifetime-value column is handed to the model.
///
/// The shipped artifact was built against whole-number CLTV values, so the
/// default drops the fractional part. `Exact` passes the value through
/// untouched. A truncation that changes the value is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CltvEncoding {
    #[default]
    Truncate,
    Exact,
}

impl CltvEncoding {
    pub fn apply(self, cltv: f64) -> f64 {
        match self {
            CltvEncoding::Truncate => cltv.trunc(),
            CltvEncoding::Exact => cltv,
        }
    }

    /// True when `apply` would change the value.
    pub fn alters(self, cltv: f64) -> bool {
        self == CltvEncoding::Truncate && cltv.fract() != 0.0
    }

    pub fn parse(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value.trim(), true).ok()
    }
}

/// Binary model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChurnLabel {
    Stay,
    Churn,
}

impl ChurnLabel {
    /// Map a raw class label (0 = stay, 1 = churn).
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(ChurnLabel::Stay),
            1 => Some(ChurnLabel::Churn),
            _ => None,
        }
    }

    pub fn class(self) -> i64 {
        match self {
            ChurnLabel::Stay => 0,
            ChurnLabel::Churn => 1,
        }
    }

    /// The fixed message rendered for this label.
    pub fn message(self) -> &'static str {
        match self {
            ChurnLabel::Stay => "Customer is likely to Stay",
            ChurnLabel::Churn => "Customer is likely to Churn",
        }
    }
}

/// One validated model input.
///
/// Flags are stored as `0`/`1`. The payment pair is derived from
/// `payment_method`, so `credit_card + mailed_check == 1` holds by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    pub age: u32,
    pub married: u8,
    pub dependents: u8,
    pub number_of_referrals: u32,
    pub tenure_in_months: u32,
    pub internet_service: u8,
    pub online_security: u8,
    pub premium_tech_support: u8,
    pub monthly_charge: f64,
    pub satisfaction_score: u8,
    pub cltv: f64,
    pub payment_method: PaymentMethod,
}

impl FeatureRecord {
    pub fn credit_card(&self) -> u8 {
        self.payment_method.one_hot().0
    }

    pub fn mailed_check(&self) -> u8 {
        self.payment_method.one_hot().1
    }

    /// Numeric row in `FEATURE_NAMES` order.
    pub fn to_row(&self, cltv: CltvEncoding) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.age),
            f64::from(self.married),
            f64::from(self.dependents),
            f64::from(self.number_of_referrals),
            f64::from(self.tenure_in_months),
            f64::from(self.internet_service),
            f64::from(self.online_security),
            f64::from(self.premium_tech_support),
            self.monthly_charge,
            f64::from(self.satisfaction_score),
            cltv.apply(self.cltv),
            f64::from(self.credit_card()),
            f64::from(self.mailed_check()),
        ]
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FeatureRecord", FEATURE_COUNT)?;
        s.serialize_field("age", &self.age)?;
        s.serialize_field("married", &self.married)?;
        s.serialize_field("dependents", &self.dependents)?;
        s.serialize_field("number_of_referrals", &self.number_of_referrals)?;
        s.serialize_field("tenure_in_months", &self.tenure_in_months)?;
        s.serialize_field("internet_service", &self.internet_service)?;
        s.serialize_field("online_security", &self.online_security)?;
        s.serialize_field("premium_tech_support", &self.premium_tech_support)?;
        s.serialize_field("monthly_charge", &self.monthly_charge)?;
        s.serialize_field("satisfaction_score", &self.satisfaction_score)?;
        s.serialize_field("cltv", &self.cltv)?;
        s.serialize_field("credit_card", &self.credit_card())?;
        s.serialize_field("mailed_check", &self.mailed_check())?;
        s.end()
    }
}
