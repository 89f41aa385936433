//! File sink
//!
//! Appends every record to one file as a pretty-printed JSON document.

use super::LogSink;
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use crate::logging::record::LogRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct FileSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn write(&self, record: &LogRecord) -> Result<()> {
        let mut text = serde_json::to_string_pretty(record)?;
        text.push('\n');

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Logging(format!(
                    "Failed to create log directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                AppError::Logging(format!(
                    "Failed to open log file {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogEntry, LogLevel, LogMode, Logger};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_appends_pretty_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("log.txt");
        let sink = Arc::new(FileSink::new(&path));
        let logger = Logger::new(9, Some(sink), LogMode::Error);

        let (ok_first, _) = logger.log(LogEntry::new(LogLevel::Info, 200, "first")).await;
        let (ok_second, _) = logger.log(LogEntry::new(LogLevel::Error, 500, "second")).await;
        assert!(ok_first && ok_second);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n  \"api_id\": 9"));
        let documents: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&contents)
            .into_iter()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1]["message"], "second");
    }

    #[tokio::test]
    async fn test_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());
        let logger = Logger::console(1, LogMode::Error);
        let record = logger.record(LogEntry::new(LogLevel::Info, 200, "x"));
        assert!(sink.write(&record).await.is_err());
    }
}
