//! Process-wide logging setup.
//!
//! `init` is called once from `main`; the returned guard must live until
//! shutdown so buffered file output is flushed.

use anyhow::{Context, Result};
use std::any::Any;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "translate.log";

/// Keeps the background file writer alive.
pub struct LogGuard {
    _file: WorkerGuard,
}

/// Console output plus a daily-rotated JSON file under `log_dir`.
pub fn init(config: &Config) -> Result<LogGuard> {
    let filter = EnvFilter::try_new(format!(
        "{level},tower_http={level}",
        level = config.log_level
    ))
    .unwrap_or_else(|_| EnvFilter::new("info"));

    let appender = file_appender(config)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().json().with_ansi(false).with_writer(file_writer))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard { _file: guard })
}

/// Daily files named `translate.log.YYYY-MM-DD`; only the newest
/// `log_max_files` are kept.
pub fn file_appender(config: &Config) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory {}", config.log_dir))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(config.log_max_files.max(1))
        .build(&config.log_dir)
        .with_context(|| format!("Failed to open log file in {}", config.log_dir))
}

/// Route panics through `tracing` so they land in the log file too.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(%location, "Panic: {}", panic_message(info.payload()));
    }));
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown error".to_string()
    }
}
