//! Logging and observability
//!
//! Two layers live here:
//! - [`init_logging`] installs the `tracing` subscriber used for diagnostics
//!   throughout the crate
//! - [`Logger`] writes structured [`LogRecord`]s stamped with the API id to
//!   the console and to a persistent [`LogSink`] (file or Cosmos DB)
//!
//! # Example
//!
//! ```no_run
//! use api_template::config::LoggingConfig;
//! use api_template::logging::{init_logging, LogEntry, LogLevel, Logger};
//!
//! # async fn example() -> api_template::domain::Result<()> {
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config)?;
//!
//! let logger = Logger::from_config(1, &config)?;
//! logger.log(LogEntry::new(LogLevel::Warning, 400, "Bad request")).await;
//! # Ok(())
//! # }
//! ```

pub mod logger;
pub mod record;
pub mod sink;
pub mod structured;

// Re-export commonly used items
pub use logger::{LogEntry, LogLevel, LogMode, Logger};
pub use record::LogRecord;
pub use sink::LogSink;
pub use structured::{bootstrap_subscriber, init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use api_template::log_error_with_context;
/// use api_template::domain::AppError;
///
/// let error = AppError::Configuration("Invalid config".to_string());
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
