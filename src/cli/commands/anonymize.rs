//! Anonymize command implementation
//!
//! Runs the anonymizer over a JSON file using rules from a TOML file.
//!
//! ```toml
//! strip = ["password", "token"]
//! wild_change = true
//!
//! [[change]]
//! keys = ["email"]
//! redaction = { kind = "email" }
//! ```

use crate::anonymization::{AnonymizationConfig, Anonymizer, Data, Table};
use anyhow::Context;
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Anonymization rules (TOML)
    #[arg(long)]
    pub rules: PathBuf,

    /// Input JSON file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Read the input as a table of `columns` and `rows`
    #[arg(long)]
    pub table: bool,

    /// Output file; the result is printed when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(
            rules = %self.rules.display(),
            input = %self.input.display(),
            table = self.table,
            "Anonymizing data"
        );

        let rules = match AnonymizationConfig::from_file(&self.rules) {
            Ok(rules) => rules,
            Err(e) => {
                eprintln!("❌ Failed to load anonymization rules");
                eprintln!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };
        let anonymizer = Anonymizer::new(rules)?;

        let contents = std::fs::read_to_string(&self.input)
            .with_context(|| format!("Failed to read {}", self.input.display()))?;
        let value: Value = serde_json::from_str(&contents)
            .with_context(|| format!("{} is not valid JSON", self.input.display()))?;

        let data = if self.table {
            let table: Table = serde_json::from_value(value)
                .context("Input is not a table of columns and rows")?;
            Data::Table(table)
        } else {
            Data::Json(value)
        };

        let result = anonymizer.anonymize(data)?;
        let rendered = serde_json::to_string_pretty(&result)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, rendered + "\n")
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("✅ Anonymized data written to {}", path.display());
            }
            None => println!("{rendered}"),
        }
        Ok(0)
    }
}
