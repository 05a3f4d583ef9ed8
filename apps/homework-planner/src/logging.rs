//! File logging setup.
//!
//! The terminal belongs to the UI, so events go to a log file. Logging is
//! off unless enabled in the config or `HOMEWORK_PLANNER_LOG` is set.

use crate::config::{Config, LoggingConfig};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "HOMEWORK_PLANNER_LOG";

/// Install the global subscriber. Returns the log file path when active.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<std::path::PathBuf>> {
    let env_directive = std::env::var(LOG_ENV).ok().filter(|v| !v.trim().is_empty());
    if !config.enabled && env_directive.is_none() {
        return Ok(None);
    }

    let Some(path) = config.file.clone().or_else(Config::log_path) else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let directive = env_directive.unwrap_or_else(|| config.level.clone());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    Ok(Some(path))
}
