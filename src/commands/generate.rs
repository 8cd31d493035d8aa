// src/commands/generate.rs
//! The generation command: run, then write or check the artifact.

use std::process::ExitCode;

use crate::cli::ColorMode;
use crate::config::Config;
use crate::errors::GenerateError;
use crate::errors::render_to_stderr;
use crate::errors::report::render_to_stderr_styled;

/// Generate, then write (or, with `--check`, verify) the artifact.
/// Diagnostics go to stderr; any failure exits with status 1.
pub fn generate(config: &Config, color: ColorMode) -> ExitCode {
    let result = crate::run(config).and_then(|artifact| {
        if config.check {
            artifact.check()?;
        } else {
            artifact.write()?;
        }
        Ok::<_, GenerateError>(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match color {
                ColorMode::Auto => render_to_stderr(&e),
                ColorMode::Always => render_to_stderr_styled(&e, true),
                ColorMode::Never => render_to_stderr_styled(&e, false),
            }
            ExitCode::FAILURE
        }
    }
}
