//! Domain types shared by the form, the handler and the model.
//!
//! This module defines:
//!
//! - the fixed-order model input (`FeatureRecord`, `FEATURE_NAMES`)
//! - the categorical inputs (`PaymentMethod`, `CltvEncoding`)
//! - the model output (`ChurnLabel`)

pub mod types;

pub use types::*;
