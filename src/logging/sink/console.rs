//! Console output of log records
//!
//! The console is not a [`super::LogSink`]; the logger prints through it
//! according to its mode and then stores the record in the configured sink.

use crate::logging::logger::LogLevel;
use crate::logging::record::LogRecord;
use std::sync::{Arc, Mutex};

/// Standard stream a record is printed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

impl ConsoleStream {
    /// Errors and warnings go to stderr
    pub fn for_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Error | LogLevel::Warning => ConsoleStream::Stderr,
            LogLevel::Info | LogLevel::Debug => ConsoleStream::Stdout,
        }
    }
}

type Captured = Arc<Mutex<Vec<(ConsoleStream, String)>>>;

/// Prints records as single-line JSON
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink {
    capture: Option<Captured>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that records lines instead of printing them
    pub fn capturing() -> Self {
        Self {
            capture: Some(Arc::default()),
        }
    }

    /// Lines captured so far
    pub fn captured(&self) -> Vec<(ConsoleStream, String)> {
        self.capture
            .as_ref()
            .and_then(|c| c.lock().ok().map(|lines| lines.clone()))
            .unwrap_or_default()
    }

    pub fn emit(&self, record: &LogRecord) {
        let stream = ConsoleStream::for_level(record.level);
        let line = record.to_json_string();
        match &self.capture {
            Some(capture) => {
                if let Ok(mut lines) = capture.lock() {
                    lines.push((stream, line));
                }
            }
            None => match stream {
                ConsoleStream::Stdout => println!("{line}"),
                ConsoleStream::Stderr => eprintln!("{line}"),
            },
        }
    }
}
