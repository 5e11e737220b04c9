//! `churn-predictor` library crate.
//!
//! The binary (`churn`) is a thin wrapper around this library so that:
//!
//! - the prediction handler is testable without a terminal
//! - the form, the model and the front-ends stay separate
//! - the terminal form and the headless command share one code path

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod io;
pub mod logging;
pub mod models;
pub mod report;
pub mod tui;
