//! Structured logger
//!
//! Builds [`LogRecord`]s stamped with the API id, prints them to the console
//! according to the [`LogMode`] and hands every record to the configured
//! persistent sink.
//!
//! # Example
//!
//! ```no_run
//! use api_template::logging::{LogEntry, LogLevel, LogMode, Logger};
//!
//! # async fn example() {
//! let logger = Logger::console(1, LogMode::Info);
//! let (stored, record) = logger
//!     .log(LogEntry::new(LogLevel::Info, 200, "started").path("main"))
//!     .await;
//! assert!(stored);
//! assert_eq!(record.api_id, 1);
//! # }
//! ```

use super::record::LogRecord;
use super::sink::{ConsoleSink, DocumentDbSink, FileSink, LogSink};
use crate::config::{LoggingConfig, SinkKind};
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use chrono::{SecondsFormat, Utc};
use std::error::Error as StdError;
use std::str::FromStr;
use std::sync::Arc;

/// Severity of a record; the numeric code is what gets stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn code(self) -> i32 {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Info => 1,
            LogLevel::Warning => 2,
            LogLevel::Error => 99,
        }
    }
}

/// Console verbosity, from quietest to loudest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogMode {
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

impl LogMode {
    /// Whether a record of `level` is printed in this mode
    ///
    /// Error records always print. Info records are gated like the other
    /// levels and stay silent in Error and Warning modes. The persistent
    /// sink receives every record regardless.
    pub fn allows(self, level: LogLevel) -> bool {
        match level {
            LogLevel::Error => true,
            LogLevel::Warning => self >= LogMode::Warning,
            LogLevel::Info => self >= LogMode::Info,
            LogLevel::Debug => self == LogMode::Debug,
        }
    }
}

impl FromStr for LogMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogMode::Error),
            "warning" | "warn" => Ok(LogMode::Warning),
            "info" => Ok(LogMode::Info),
            "debug" => Ok(LogMode::Debug),
            other => Err(AppError::Configuration(format!(
                "Invalid log mode '{other}'. Must be one of: error, warning, info, debug"
            ))),
        }
    }
}

/// Input for [`Logger::log`]
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub status_code: u16,
    pub message: String,
    pub path: Option<String>,
    pub user: Option<String>,
    pub uuid: Option<String>,
    pub trace_id: Option<String>,
    pub traceback: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            level,
            status_code,
            message: message.into(),
            path: None,
            user: None,
            uuid: None,
            trace_id: None,
            traceback: None,
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Attach an error; its source chain becomes the traceback of error records
    pub fn error(mut self, err: &(dyn StdError + 'static)) -> Self {
        let mut chain = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        self.traceback = Some(chain.join("\nCaused by: "));
        self
    }
}

/// Structured logger bound to one API id
pub struct Logger {
    api_id: i64,
    mode: LogMode,
    treat_all_args_as_string: bool,
    console: ConsoleSink,
    sink: Option<Arc<dyn LogSink>>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("api_id", &self.api_id)
            .field("mode", &self.mode)
            .field("sink", &self.sink.as_ref().map(|s| s.name()))
            .finish()
    }
}

impl Logger {
    /// Logger with an optional persistent sink
    pub fn new(api_id: i64, sink: Option<Arc<dyn LogSink>>, mode: LogMode) -> Self {
        Self {
            api_id,
            mode,
            treat_all_args_as_string: false,
            console: ConsoleSink::new(),
            sink,
        }
    }

    /// Console-only logger
    pub fn console(api_id: i64, mode: LogMode) -> Self {
        Self::new(api_id, None, mode)
    }

    pub fn with_string_args(mut self, treat_all_args_as_string: bool) -> Self {
        self.treat_all_args_as_string = treat_all_args_as_string;
        self
    }

    /// Replace the console writer, mainly for capturing output
    pub fn with_console(mut self, console: ConsoleSink) -> Self {
        self.console = console;
        self
    }

    /// Build the logger described by the LOGGING section
    pub fn from_config(api_id: i64, config: &LoggingConfig) -> Result<Self> {
        let mode: LogMode = config.mode.parse()?;
        let sink: Option<Arc<dyn LogSink>> = match config.sink {
            SinkKind::Stdout => None,
            SinkKind::File => Some(Arc::new(FileSink::new(&config.file_path))),
            SinkKind::Database => {
                let db = config.database.as_ref().ok_or_else(|| {
                    AppError::Configuration(
                        "DATABASE section is required for the database sink".to_string(),
                    )
                })?;
                Some(Arc::new(DocumentDbSink::new(db)?))
            }
        };

        tracing::debug!(
            api_id,
            sink = ?config.sink,
            mode = ?mode,
            "Structured logger created"
        );

        Ok(Self::new(api_id, sink, mode).with_string_args(config.treat_all_args_as_string))
    }

    pub fn api_id(&self) -> i64 {
        self.api_id
    }

    pub fn mode(&self) -> LogMode {
        self.mode
    }

    pub fn sink(&self) -> Option<&Arc<dyn LogSink>> {
        self.sink.as_ref()
    }

    /// Prepare the persistent sink, e.g. create the log container
    pub async fn prepare(&self) -> Result<()> {
        match &self.sink {
            Some(sink) => sink.prepare().await,
            None => Ok(()),
        }
    }

    /// Build the record for an entry without emitting it
    pub fn record(&self, entry: LogEntry) -> LogRecord {
        LogRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            api_id: self.api_id,
            level: entry.level,
            status_code: entry.status_code,
            message: Some(entry.message),
            traceback: entry.traceback.filter(|_| entry.level == LogLevel::Error),
            path: entry.path,
            user: entry.user,
            uuid: entry.uuid,
            trace_id: entry.trace_id,
            treat_all_args_as_string: self.treat_all_args_as_string,
        }
    }

    /// Emit an entry on the console only
    pub fn log_console(&self, entry: LogEntry) -> LogRecord {
        let record = self.record(entry);
        self.print(&record);
        record
    }

    /// Emit an entry on the console and store it in the persistent sink
    ///
    /// Returns whether the sink accepted the record. Sink failures are
    /// reported through tracing and never propagated.
    pub async fn log(&self, entry: LogEntry) -> (bool, LogRecord) {
        let record = self.record(entry);
        self.print(&record);

        let stored = match &self.sink {
            None => true,
            Some(sink) => match sink.write(&record).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(sink = sink.name(), error = %e, "Failed to store log record");
                    false
                }
            },
        };
        (stored, record)
    }

    fn print(&self, record: &LogRecord) {
        if self.mode.allows(record.level) {
            self.console.emit(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::sink::MemorySink;
    use test_case::test_case;

    #[test_case(LogMode::Error, LogLevel::Error, true)]
    #[test_case(LogMode::Error, LogLevel::Warning, false)]
    #[test_case(LogMode::Warning, LogLevel::Warning, true)]
    #[test_case(LogMode::Warning, LogLevel::Info, false)]
    #[test_case(LogMode::Error, LogLevel::Info, false)]
    #[test_case(LogMode::Debug, LogLevel::Info, true)]
    #[test_case(LogMode::Info, LogLevel::Info, true)]
    #[test_case(LogMode::Info, LogLevel::Debug, false)]
    #[test_case(LogMode::Debug, LogLevel::Debug, true)]
    fn test_mode_gating(mode: LogMode, level: LogLevel, expected: bool) {
        assert_eq!(mode.allows(level), expected);
    }

    #[test]
    fn test_level_codes() {
        assert_eq!(LogLevel::Debug.code(), 0);
        assert_eq!(LogLevel::Info.code(), 1);
        assert_eq!(LogLevel::Warning.code(), 2);
        assert_eq!(LogLevel::Error.code(), 99);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("WARNING".parse::<LogMode>().unwrap(), LogMode::Warning);
        assert!("loud".parse::<LogMode>().is_err());
    }

    #[test]
    fn test_traceback_only_on_errors() {
        let logger = Logger::console(1, LogMode::Error);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");

        let record = logger.record(LogEntry::new(LogLevel::Error, 500, "boom").error(&io));
        assert_eq!(record.traceback.as_deref(), Some("disk full"));

        let record = logger.record(LogEntry::new(LogLevel::Info, 200, "ok").error(&io));
        assert_eq!(record.traceback, None);
    }

    #[test]
    fn test_traceback_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "inner"));
        let entry = LogEntry::new(LogLevel::Error, 500, "x").error(&err);
        assert_eq!(entry.traceback.as_deref(), Some("outer\nCaused by: inner"));
    }

    #[tokio::test]
    async fn test_sink_receives_every_level() {
        let sink = Arc::new(MemorySink::default());
        let logger = Logger::new(5, Some(sink.clone()), LogMode::Error);

        let (stored, record) = logger
            .log(LogEntry::new(LogLevel::Debug, 200, "quiet").uuid("abc"))
            .await;
        assert!(stored);
        assert_eq!(record.api_id, 5);
        assert_eq!(record.uuid.as_deref(), Some("abc"));
        assert_eq!(sink.records().len(), 1);
    }

    #[tokio::test]
    async fn test_sink_failure_is_reported() {
        let sink = Arc::new(MemorySink::failing());
        let logger = Logger::new(5, Some(sink), LogMode::Info);
        let (stored, _) = logger.log(LogEntry::new(LogLevel::Info, 200, "x")).await;
        assert!(!stored);
    }

    #[test]
    fn test_from_config_file_sink() {
        let config = LoggingConfig {
            sink: SinkKind::File,
            mode: "debug".to_string(),
            treat_all_args_as_string: true,
            ..LoggingConfig::default()
        };
        let logger = Logger::from_config(3, &config).unwrap();
        assert_eq!(logger.mode(), LogMode::Debug);
        assert_eq!(logger.sink().map(|s| s.name()), Some("file"));
        assert!(logger.record(LogEntry::new(LogLevel::Info, 200, "x")).treat_all_args_as_string);
    }

    #[tokio::test]
    async fn test_stdout_sink_prints_once() {
        let config = LoggingConfig {
            sink: SinkKind::Stdout,
            mode: "warning".to_string(),
            ..LoggingConfig::default()
        };
        let console = ConsoleSink::capturing();
        let logger = Logger::from_config(3, &config)
            .unwrap()
            .with_console(console.clone());
        assert!(logger.sink().is_none());

        let (stored, _) = logger.log(LogEntry::new(LogLevel::Warning, 404, "x")).await;
        assert!(stored);
        assert_eq!(console.captured().len(), 1);
    }

    #[test]
    fn test_from_config_database_without_section() {
        let config = LoggingConfig {
            sink: SinkKind::Database,
            ..LoggingConfig::default()
        };
        assert!(Logger::from_config(3, &config).is_err());
    }
}
