//! Churn classifier.
//!
//! The handler only sees the `ChurnModel` trait; the concrete implementation is
//! a tree ensemble read from a JSON artifact at startup (`forest`).

use std::sync::Arc;

use crate::domain::{ChurnLabel, FEATURE_COUNT};
use crate::error::PredictError;

pub mod forest;

pub use forest::{ForestArtifact, RandomForest, TreeArrays, FOREST_FORMAT};

/// A pre-trained binary classifier.
///
/// Implementations must be pure: the same row always yields the same label and
/// `predict` never mutates shared state, so one instance can serve every
/// trigger for the life of the process.
pub trait ChurnModel: Send + Sync {
    fn predict(&self, row: &[f64; FEATURE_COUNT]) -> Result<ChurnLabel, PredictError>;
}

/// Read-only model handle built once at startup and passed to the handler.
pub type SharedModel = Arc<dyn ChurnModel>;
