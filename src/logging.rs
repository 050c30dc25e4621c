//! Tracing subscriber setup.
//!
//! The filter is read from `SDR_LOG` (e.g. `SDR_LOG=debug`), default `warn`.
//! Output goes to the configured log file, else to stderr for one-shot
//! commands. The TUI owns the terminal, so without a log file its output is
//! discarded.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SDR_LOG";

/// Where log output goes when no log file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Stderr,
    Discard,
}

/// Install the global subscriber.
pub fn init(log_file: Option<&Path>, fallback: Fallback) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => match fallback {
            Fallback::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
            Fallback::Discard => (BoxMakeWriter::new(std::io::sink), false),
        },
    };

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .try_init();
    Ok(())
}
