//! Integration tests for the structured logger

use api_template::config::{LoggingConfig, SinkKind};
use api_template::logging::sink::{ConsoleSink, ConsoleStream, FileSink};
use api_template::logging::{LogEntry, LogLevel, LogMode, Logger};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_file_sink_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs").join("api.log");

    let config = LoggingConfig {
        sink: SinkKind::File,
        mode: "error".to_string(),
        file_path: log_path.to_string_lossy().to_string(),
        ..LoggingConfig::default()
    };
    let logger = Logger::from_config(21, &config).unwrap();
    logger.prepare().await.unwrap();

    let (stored, _) = logger
        .log(LogEntry::new(LogLevel::Info, 200, "first").path("tests"))
        .await;
    assert!(stored);
    logger
        .log(LogEntry::new(LogLevel::Warning, 404, "second").user("ann"))
        .await;

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("\"first\""));
    assert!(contents.contains("\"second\""));
    assert!(contents.contains("\"api_id\": 21"));
    assert!(contents.contains("\"ann\""));
}

#[tokio::test]
async fn test_string_args_in_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("api.log");

    let logger = Logger::new(
        3,
        Some(Arc::new(FileSink::new(&log_path))),
        LogMode::Error,
    )
    .with_string_args(true);
    logger
        .log(LogEntry::new(LogLevel::Error, 500, "boom"))
        .await;

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("\"api_id\": \"3\""));
    assert!(contents.contains("\"status_code\": \"500\""));
}

#[tokio::test]
async fn test_console_gating_by_mode() {
    let console = ConsoleSink::capturing();
    let logger = Logger::console(1, LogMode::Warning).with_console(console.clone());

    logger.log(LogEntry::new(LogLevel::Debug, 200, "debug")).await;
    logger.log(LogEntry::new(LogLevel::Info, 200, "info")).await;
    logger.log(LogEntry::new(LogLevel::Warning, 400, "warn")).await;
    logger.log(LogEntry::new(LogLevel::Error, 500, "error")).await;

    let captured = console.captured();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].0, ConsoleStream::Stderr);
    assert!(captured[0].1.contains("warn"));
    assert!(captured[1].1.contains("error"));
}
