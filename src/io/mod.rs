//! Input/output helpers.
//!
//! - model artifact loading (`artifact`)

pub mod artifact;

pub use artifact::*;
