// API Template - HTTP API service with anonymization and structured logging
// Copyright (c) 2025 API Template Contributors
// Licensed under the MIT License

//! # API Template
//!
//! Boilerplate for small HTTP API services: an INI configuration with
//! environment overrides, health and benchmark endpoints, a data
//! anonymization helper and a structured logger with console, file and
//! Cosmos DB sinks.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`server`] - axum router, middleware and handlers
//! - [`anonymization`] - Strip, overwrite and alter values by key
//! - [`domain`] - Error types and request models
//! - [`config`] - INI loading and the process-wide configuration
//! - [`logging`] - Structured logger and tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use api_template::config;
//! use api_template::logging::Logger;
//! use api_template::server::{start_server, AppState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = config::global::get_or_load("config.ini")?;
//!     let logger = Arc::new(Logger::from_config(config.api_id, &config.logging)?);
//!
//!     start_server(Arc::new(AppState::new(config, logger))).await
//! }
//! ```
//!
//! ## Anonymization
//!
//! ```rust
//! use api_template::anonymization::{AnonymizationConfig, Anonymizer, ChangeRule, Redaction};
//! use api_template::anonymization::redaction::EmailRedaction;
//! use serde_json::json;
//!
//! let config = AnonymizationConfig::default()
//!     .with_strip(["password"])
//!     .with_change(ChangeRule::new(["email"], Redaction::Email(EmailRedaction::default())));
//!
//! let out = Anonymizer::new(config)?.anonymize_value(json!({
//!     "email": "Jane.Doe@Example.com",
//!     "password": "secret"
//! }))?;
//! assert_eq!(out, json!({"email": "anonymized@example.com"}));
//! # Ok::<(), api_template::domain::AnonymizationError>(())
//! ```
//!
//! ## Logging
//!
//! Diagnostics use the `tracing` crate. Records meant for the log store go
//! through [`logging::Logger`]:
//!
//! ```rust,no_run
//! use api_template::logging::{LogEntry, LogLevel, LogMode, Logger};
//!
//! # async fn example() {
//! let logger = Logger::console(1, LogMode::Warning);
//! logger.log(LogEntry::new(LogLevel::Error, 500, "Export failed")).await;
//! # }
//! ```

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod server;
