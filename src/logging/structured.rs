//! Tracing subscriber setup
//!
//! Console output is always on. When `trace_dir` is configured a daily
//! rolling JSON file is written as well. [`bootstrap_subscriber`] covers the
//! window before the configuration is loaded.
//!
//! # Example
//!
//! ```no_run
//! use api_template::logging::init_logging;
//! use api_template::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//! // Keep _guard alive for the duration of the program
//! ```

use crate::config::LoggingConfig;
use crate::domain::{AppError, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the background file writer alive; logs are flushed on drop
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            _file_guard: file_guard,
        }
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `log_level_str`.
///
/// # Errors
///
/// Fails on an unknown level, when the trace directory cannot be created or
/// when a subscriber is already installed.
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_level = parse_log_level(log_level_str)?;
    let env_filter = env_filter(log_level);

    let mut layers = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(env_filter.clone());
    layers.push(console_layer.boxed());

    let file_guard = match config.trace_dir {
        Some(ref dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                AppError::Configuration(format!("Failed to create trace directory {dir}: {e}"))
            })?;

            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "api-template.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(non_blocking)
                .with_filter(env_filter);
            layers.push(file_layer.boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| AppError::Logging(format!("Failed to install subscriber: {e}")))?;

    tracing::info!(
        level = %log_level,
        trace_dir = ?config.trace_dir,
        sink = ?config.sink,
        "Logging initialized"
    );

    Ok(LoggingGuard::new(file_guard))
}

/// Console-only subscriber for code that runs before [`init_logging`]
///
/// The global subscriber depends on the LOGGING section, so configuration
/// loading runs under this one via `tracing::subscriber::with_default`.
pub fn bootstrap_subscriber<W>(
    log_level_str: &str,
    writer: W,
) -> Result<impl tracing::Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let log_level = parse_log_level(log_level_str)?;
    Ok(tracing_subscriber::fmt()
        .with_target(true)
        .with_writer(writer)
        .with_env_filter(env_filter(log_level))
        .finish())
}

/// `RUST_LOG` if set, otherwise `log_level` for this crate and the HTTP stack
fn env_filter(log_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "api_template={log_level},tower_http={log_level},axum={log_level}"
        ))
    })
}

/// Parse log level from string
fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(AppError::Configuration(format!(
            "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            level_str
        ))),
    }
}
