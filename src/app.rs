//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves settings and starts logging
//! - loads the model artifact once
//! - hands the shared model to the chosen front-end

use std::sync::Arc;

use clap::Parser;

use crate::cli::{Command, PredictArgs, TuiArgs};
use crate::config::Settings;
use crate::error::{AppError, EXIT_RUNTIME, EXIT_USAGE};
use crate::logging::Surface;
use crate::models::SharedModel;

pub mod predict;

use predict::OutputRegion;

/// Entry point for the `churn` binary.
pub fn run() -> Result<(), AppError> {
    // `churn` and `churn --model x.json` behave like `churn tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Tui(args) => handle_tui(args, settings),
        Command::Predict(args) => handle_predict(args, settings),
    }
}

/// Load the model artifact named by `settings`. Failure is fatal for every command.
pub fn load_model(settings: &Settings) -> Result<SharedModel, AppError> {
    let forest = crate::io::read_model_json(&settings.model_path).inspect_err(|err| {
        log::error!("{err}");
    })?;
    log::info!(
        "loaded model {} ({} trees, {} nodes, max depth {})",
        settings.model_path.display(),
        forest.n_trees(),
        forest.n_nodes(),
        forest.max_depth()
    );
    Ok(Arc::new(forest))
}

fn handle_tui(args: TuiArgs, mut settings: Settings) -> Result<(), AppError> {
    settings.apply(&args.model);
    crate::logging::init(&settings, Surface::Terminal)?;
    let model = load_model(&settings)?;
    crate::tui::run(model, settings.cltv_encoding)
}

fn handle_predict(args: PredictArgs, mut settings: Settings) -> Result<(), AppError> {
    settings.apply(&args.model);
    crate::logging::init(&settings, Surface::Headless)?;
    let model = load_model(&settings)?;

    let output = predict::on_predict(1, &args.controls(), &*model, settings.cltv_encoding);

    if args.json {
        let report = crate::report::PredictionReport::from_output(&output);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to encode report: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_output(&output));
        if args.show_record {
            if let Some(outcome) = output.outcome() {
                println!("\n{}", crate::report::format_record(&outcome.record));
            }
        }
    }

    exit_status(&output)
}

/// Map a headless result to the process outcome.
fn exit_status(output: &OutputRegion) -> Result<(), AppError> {
    match output {
        OutputRegion::Outcome(_) | OutputRegion::Empty => Ok(()),
        OutputRegion::InvalidInput(err) => {
            Err(AppError::new(EXIT_USAGE, format!("Invalid input: {err}")))
        }
        OutputRegion::Unavailable(reason) => Err(AppError::new(
            EXIT_RUNTIME,
            format!("Prediction unavailable: {reason}"),
        )),
    }
}

/// Rewrite argv so `churn` defaults to `churn tui`.
///
/// Rules:
/// - `churn`                      -> `churn tui`
/// - `churn --model x.json ...`   -> `churn tui --model x.json ...`
/// - `churn --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "predict");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
