//! Runtime settings.
//!
//! Resolution order (later wins):
//!
//! 1. built-in defaults
//! 2. `.env` / process environment (`CHURN_MODEL_PATH`, `CHURN_CLTV_ENCODING`,
//!    `CHURN_LOG_FILE`)
//! 3. command-line flags

use std::path::PathBuf;

use crate::cli::ModelArgs;
use crate::domain::CltvEncoding;
use crate::error::{AppError, EXIT_USAGE};

/// Model artifact used when nothing else is configured.
pub const DEFAULT_MODEL_PATH: &str = "models/rf.json";

pub const ENV_MODEL_PATH: &str = "CHURN_MODEL_PATH";
pub const ENV_CLTV_ENCODING: &str = "CHURN_CLTV_ENCODING";
pub const ENV_LOG_FILE: &str = "CHURN_LOG_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub cltv_encoding: CltvEncoding,
    /// Append log records here instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            cltv_encoding: CltvEncoding::default(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Load `.env` (if any) and read settings from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(path) = get(ENV_MODEL_PATH) {
            settings.model_path = PathBuf::from(path.trim());
        }
        if let Some(raw) = get(ENV_CLTV_ENCODING) {
            settings.cltv_encoding = CltvEncoding::parse(&raw).ok_or_else(|| {
                AppError::new(
                    EXIT_USAGE,
                    format!("Invalid {ENV_CLTV_ENCODING}='{raw}' (expected 'truncate' or 'exact')."),
                )
            })?;
        }
        if let Some(path) = get(ENV_LOG_FILE) {
            settings.log_file = Some(PathBuf::from(path.trim()));
        }

        Ok(settings)
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, args: &ModelArgs) {
        if let Some(path) = &args.model {
            self.model_path = path.clone();
        }
        if let Some(encoding) = args.cltv_encoding {
            self.cltv_encoding = encoding;
        }
    }
}
