//! Tracing setup for the command line tool

use crate::config::config::LoggingConfig;
use crate::utils::app_paths::AppPaths;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter, e.g. `dataspot=debug`
pub const LOG_ENV_VAR: &str = "DATASPOT_LOG";

/// Local wall-clock time with milliseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Filter from DATASPOT_LOG, else the configured level, else `warn`
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Timestamped log file name in `dir`
pub fn log_file_path(dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("dataspot_{}.log", timestamp))
}

/// Install the global subscriber: compact stderr output plus an optional
/// log file. Returns the log file path when file logging is on.
pub fn init_tracing(settings: &LoggingConfig) -> Result<Option<PathBuf>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_timer(LocalTimer)
        .compact();

    let (file_layer, log_path) = if settings.log_to_file {
        let path = log_file_path(&AppPaths::log_dir()?);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create log file: {:?}", path))?;
        let layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_target(true)
            .with_ansi(false)
            .with_timer(LocalTimer);
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(build_filter(&settings.level))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    if let Some(path) = &log_path {
        tracing::info!(target: "dataspot", "Logging to {:?}", path);
    }
    Ok(log_path)
}
