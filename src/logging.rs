//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log filter")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match (config.output.as_str(), config.format.as_str()) {
        ("file", format) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.file_path)
                .with_context(|| format!("Failed to open log file {}", config.file_path))?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if format == "json" {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        (_, "json") => builder.json().try_init(),
        _ => builder.pretty().try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
