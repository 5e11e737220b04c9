//! Command-line parsing for the churn predictor.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! form, the handler and the model.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::CltvEncoding;
use crate::form::{ControlId, ControlState};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "churn", version, about = "Telecom customer churn predictor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form.
    Tui(TuiArgs),
    /// Run a single prediction from flags and print the result.
    ///
    /// Every control defaults to the form's default value, so only the fields
    /// that differ need to be passed.
    Predict(PredictArgs),
}

/// Model selection shared by every command. Flags override the environment.
#[derive(Debug, Args, Clone, Default)]
pub struct ModelArgs {
    /// Model artifact (JSON). Defaults to $CHURN_MODEL_PATH or models/rf.json.
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// How customer lifetime value is passed to the model.
    #[arg(long, value_enum)]
    pub cltv_encoding: Option<CltvEncoding>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

/// Control values for a headless prediction.
///
/// Values are taken as text and validated by the same code the form uses, so a
/// bad value produces the form's validation message rather than a clap error.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[arg(long, default_value = "25", allow_hyphen_values = true)]
    pub age: String,

    /// 1 = yes, 0 = no.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub married: String,

    /// 1 = yes, 0 = no.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub dependents: String,

    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub referrals: String,

    #[arg(long, default_value = "8", allow_hyphen_values = true)]
    pub tenure: String,

    /// 1 = yes, 0 = no.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub internet_service: String,

    /// 1 = yes, 0 = no.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub online_security: String,

    /// 1 = yes, 0 = no.
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub tech_support: String,

    #[arg(long, default_value = "20", allow_hyphen_values = true)]
    pub monthly_charges: String,

    /// 1 (lowest) to 5 (highest).
    #[arg(long, default_value = "3", allow_hyphen_values = true)]
    pub satisfaction: String,

    /// Customer lifetime value.
    #[arg(long, default_value = "2500", allow_hyphen_values = true)]
    pub cltv: String,

    /// "Credit Card" or "Mailed Check".
    #[arg(long, default_value = "Credit Card", allow_hyphen_values = true)]
    pub payment_method: String,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Also print the feature record sent to the model.
    #[arg(long)]
    pub show_record: bool,
}

impl PredictArgs {
    /// The form state these flags describe.
    pub fn controls(&self) -> ControlState {
        ControlState::default()
            .with(ControlId::Age, &self.age)
            .with(ControlId::Married, &self.married)
            .with(ControlId::Dependents, &self.dependents)
            .with(ControlId::Referrals, &self.referrals)
            .with(ControlId::Tenure, &self.tenure)
            .with(ControlId::InternetService, &self.internet_service)
            .with(ControlId::OnlineSecurity, &self.online_security)
            .with(ControlId::TechSupport, &self.tech_support)
            .with(ControlId::MonthlyCharges, &self.monthly_charges)
            .with(ControlId::Satisfaction, &self.satisfaction)
            .with(ControlId::Cltv, &self.cltv)
            .with(ControlId::PaymentMethod, &self.payment_method)
    }
}
