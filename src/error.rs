//! Error types.
//!
//! Two layers:
//!
//! - `AppError` is the process-level error returned from `app::run`; it carries
//!   the exit code `main` hands back to the shell.
//! - the typed enums below describe recoverable domain failures. The handler
//!   renders them into the output region instead of aborting.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for usage errors and rejected input.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for a model artifact that failed to load.
pub const EXIT_MODEL: u8 = 3;
/// Exit code for terminal failures and unavailable predictions.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ModelLoadError> for AppError {
    fn from(err: ModelLoadError) -> Self {
        AppError::new(EXIT_MODEL, err.to_string())
    }
}

/// Why a single control value was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{label}: '{value}' {reason}")]
pub struct FieldError {
    /// Human-readable control label (e.g. "Monthly Charges").
    pub label: &'static str,
    /// The raw text that failed to convert.
    pub value: String,
    pub reason: FieldErrorReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldErrorReason {
    #[error("is required")]
    Empty,
    #[error("is not a whole number")]
    NotInteger,
    /// Whole in value but spelled as a float (`1e2`, `30.0`).
    #[error("must be written as a whole number")]
    NotPlainInteger,
    #[error("is not a number")]
    NotNumber,
    #[error("is not a finite number")]
    NotFinite,
    #[error("must be at least {min}")]
    BelowMinimum { min: i64 },
    #[error("must be between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },
    #[error("is not one of: {allowed}")]
    NotAnOption { allowed: String },
}

/// Failures of a single trigger cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] FieldError),
    #[error("Prediction unavailable: {0}")]
    PredictionUnavailable(String),
}

/// Failures while loading the model artifact at startup.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Failed to open model artifact '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid model artifact '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Model artifact '{path}' rejected: {reason}")]
    Schema { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_message_names_control_and_value() {
        let err = FieldError {
            label: "Monthly Charges",
            value: "abc".to_string(),
            reason: FieldErrorReason::NotNumber,
        };
        assert_eq!(err.to_string(), "Monthly Charges: 'abc' is not a number");

        let wrapped = PredictError::from(err);
        assert!(wrapped.to_string().starts_with("Invalid input: Monthly Charges"));
    }

    #[test]
    fn model_load_error_maps_to_model_exit_code() {
        let err = ModelLoadError::Schema {
            path: PathBuf::from("models/rf.json"),
            reason: "forest has no trees".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.exit_code(), EXIT_MODEL);
        assert!(app.to_string().contains("models/rf.json"));
    }
}
