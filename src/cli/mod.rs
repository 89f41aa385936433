//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the API Template using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// API Template - HTTP API service with anonymization and structured logging
#[derive(Parser, Debug)]
#[command(name = "api-template")]
#[command(version, about, long_about = None)]
#[command(author = "API Template Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.ini", env = "APP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "APP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Anonymize a JSON document or table
    Anonymize(commands::anonymize::AnonymizeArgs),
}
