//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the BadgeBuddy application.

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard must be kept alive for the lifetime of the process,
/// otherwise buffered file output is lost on shutdown.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "badgebuddy.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a processed scan with its resolution
pub fn log_scan_event(identifier: &str, outcome: &str) {
    info!(
        identifier = identifier,
        outcome = outcome,
        "Scan processed"
    );
}

/// Log the result of a bulk email dispatch
pub fn log_dispatch_summary(successful: usize, failed: usize, total: usize) {
    info!(
        successful = successful,
        failed = failed,
        total = total,
        "Bulk dispatch finished"
    );
}
