//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered by level or `RUST_LOG`
//! - JSON-formatted local file logs with rotation
//!
//! # Example
//!
//! ```no_run
//! use titlesync::logging::init_logging;
//! use titlesync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a sync pass
///
/// # Example
///
/// ```no_run
/// use titlesync::log_pass_start;
/// use titlesync::core::sync::SyncPass;
///
/// log_pass_start!(SyncPass::Changes, 1200);
/// ```
#[macro_export]
macro_rules! log_pass_start {
    ($pass:expr, $records:expr) => {
        tracing::info!(
            pass = %$pass,
            records = $records,
            "Starting sync pass"
        );
    };
}

/// Log the completion of a sync run
///
/// # Example
///
/// ```no_run
/// use titlesync::log_sync_complete;
/// use std::time::Duration;
///
/// log_sync_complete!(1200, 3, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_sync_complete {
    ($records:expr, $failed:expr, $duration:expr) => {
        tracing::info!(
            records = $records,
            failed = $failed,
            duration_ms = $duration.as_millis() as u64,
            "Sync completed"
        );
    };
}
