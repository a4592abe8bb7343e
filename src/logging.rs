//! Logging configuration.
//!
//! Logs never go to standard output, which belongs to the commands being run.
//! The filter is read from `TINYSH_LOG` and defaults to errors only so that a
//! normal session shows nothing but command output.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TINYSH_LOG";

const DEFAULT_FILTER: &str = "error";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes logging to standard error.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes logging to `path`, truncating it first.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}
