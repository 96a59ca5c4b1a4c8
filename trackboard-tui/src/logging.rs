//! Structured logging to a file.
//!
//! The terminal belongs to the UI, so events are written as JSON lines to
//! the configured log path instead of stdout.

use crate::config::TuiConfig;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// `RUST_LOG` wins when set; otherwise the configured filter applies.
pub fn build_filter(fallback: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback).map_err(|e| LoggingError::Filter {
        filter: fallback.to_string(),
        reason: e.to_string(),
    })
}

pub fn init_logging(config: &TuiConfig) -> Result<(), LoggingError> {
    if let Some(parent) = config.log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(build_filter(&config.log_filter)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!(
        api_base_url = %config.api_base_url,
        log_path = %config.log_path.display(),
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_fallback_filter() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(build_filter("trackboard=loudest").is_err());
        assert!(build_filter("trackboard_tui=debug,info").is_ok());
    }
}
