//! Logger setup.
//!
//! Headless commands log to stderr. The terminal form owns the screen, so it
//! only logs when a log file is configured.

use std::fs::OpenOptions;

use env_logger::{Builder, Env, Target};

use crate::config::Settings;
use crate::error::{AppError, EXIT_USAGE};

/// Which front-end is about to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Headless,
    Terminal,
}

pub fn init(settings: &Settings, surface: Surface) -> Result<(), AppError> {
    let default_level = match surface {
        Surface::Headless => "warn",
        Surface::Terminal => "info",
    };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    match (&settings.log_file, surface) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::new(
                        EXIT_USAGE,
                        format!("Failed to open log file '{}': {e}", path.display()),
                    )
                })?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        (None, Surface::Terminal) => return Ok(()),
        (None, Surface::Headless) => {
            builder.target(Target::Stderr);
        }
    }

    // A logger may already be installed (e.g. by a test harness).
    let _ = builder.try_init();
    Ok(())
}
