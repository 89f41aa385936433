// API Template - HTTP API service with anonymization and structured logging
// Copyright (c) 2025 API Template Contributors
// Licensed under the MIT License

use api_template::cli::{Cli, Commands};
use api_template::config::LoggingConfig;
use api_template::log_error_with_context;
use api_template::logging::init_logging;
use clap::Parser;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command and get exit code
    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context!(&e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5 // Fatal error exit code
        }
    };

    // Exit with appropriate code
    process::exit(exit_code);
}

/// Execute the CLI command
///
/// `serve` sets up logging from the loaded configuration and owns its
/// runtime; the offline commands log to the console only.
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Serve(args) => args.execute(&cli.config, cli.log_level.as_deref()),
        Commands::ValidateConfig(args) => {
            let _guard = init_console_logging(cli)?;
            args.execute(&cli.config)
        }
        Commands::Anonymize(args) => {
            let _guard = init_console_logging(cli)?;
            args.execute()
        }
    }
}

fn init_console_logging(cli: &Cli) -> anyhow::Result<api_template::logging::LoggingGuard> {
    let log_level = cli.log_level.as_deref().unwrap_or("warn");
    let guard = init_logging(log_level, &LoggingConfig::default())?;
    Ok(guard)
}
