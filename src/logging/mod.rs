//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console logs on stderr
//! - Configurable log levels (`RUST_LOG` wins over configuration)
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use bcats::logging::init_logging;
//! use bcats::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(table = "ItemLedgerEntries", "Fetching table");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the completion of a paginated fetch
///
/// # Example
///
/// ```no_run
/// use bcats::log_fetch_complete;
/// use std::time::Duration;
///
/// log_fetch_complete!("ItemLedgerEntries", 3, 250, Duration::from_millis(840));
/// ```
#[macro_export]
macro_rules! log_fetch_complete {
    ($table:expr, $pages:expr, $records:expr, $duration:expr) => {
        tracing::info!(
            table = %$table,
            pages = $pages,
            records = $records,
            duration_ms = $duration.as_millis() as u64,
            "Downloaded {} records from {}",
            $records,
            $table
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use bcats::log_error_with_context;
/// use bcats::domain::AtsError;
///
/// let error = AtsError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
