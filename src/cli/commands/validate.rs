//! Validate config command implementation
//!
//! Loads the configuration the same way `serve` does and prints a summary
//! together with the dictionary exposed on `/config`.

use crate::config::{load_config, SinkKind};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Only print the summary, not the configuration dictionary
    #[arg(long)]
    pub quiet: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading already validates
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  API ID: {}", config.api_id);
        println!("  Version: {}", config.api_version);
        println!("  Local: {}", config.is_local);
        println!("  Debug: {}", config.debug);
        println!("  Listen Address: {}", config.server.bind_address());
        println!("  Worker Threads: {}", config.server.worker_threads());
        println!("  Log Mode: {}", config.logging.mode);

        match config.logging.sink {
            SinkKind::Stdout => println!("  Log Sink: stdout"),
            SinkKind::File => println!("  Log Sink: file ({})", config.logging.file_path),
            SinkKind::Database => {
                if let Some(ref db) = config.logging.database {
                    println!("  Log Sink: Cosmos DB");
                    println!("  Cosmos DB Endpoint: {}", db.endpoint);
                    println!("  Cosmos DB Container: {}/{}", db.database, db.container);
                }
            }
        }

        if let Some(ref folders) = config.folders {
            println!("  Folders:");
            println!("    in: {}", folders.in_folder);
            println!("    out: {}", folders.out_folder);
            println!("    test: {}", folders.test_folder);
            println!("    cache: {}", folders.cache_folder);
        }

        if !self.quiet {
            println!();
            println!("{}", serde_json::to_string_pretty(&config.configuration_dict)?);
        }
        println!();
        Ok(0)
    }
}
