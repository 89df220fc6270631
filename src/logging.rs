use std::{env, fs};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{self, APP_NAME};

/// Logs go to a file only; stdout belongs to the terminal UI.
/// The returned guard must live until exit or buffered lines are lost.
pub fn init_logger() -> anyhow::Result<WorkerGuard> {
    let filter = env::var("VENUE_TRENDS_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let log_dir = config::data_dir().join("logs");
    fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::never(&log_dir, format!("{APP_NAME}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_thread_names(true),
        )
        .with(filter_layer)
        .init();

    info!(dir = %log_dir.display(), "logging initialised");
    Ok(guard)
}
