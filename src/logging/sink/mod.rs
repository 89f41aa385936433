//! Destinations for structured log records

pub mod console;
pub mod document_db;
pub mod file;

pub use console::{ConsoleSink, ConsoleStream};
pub use document_db::DocumentDbSink;
pub use file::FileSink;

use super::record::LogRecord;
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// Persistent destination of log records
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Short sink name used in diagnostics
    fn name(&self) -> &'static str;

    /// Store one record
    async fn write(&self, record: &LogRecord) -> Result<()>;

    /// Create whatever the sink needs before the first write
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }
}

/// Sink keeping records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
    fail: bool,
}

impl MemorySink {
    /// Sink that rejects every record
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn write(&self, record: &LogRecord) -> Result<()> {
        if self.fail {
            return Err(AppError::Logging("memory sink rejects records".to_string()));
        }
        self.records
            .lock()
            .map_err(|_| AppError::Logging("memory sink lock poisoned".to_string()))?
            .push(record.clone());
        Ok(())
    }
}
