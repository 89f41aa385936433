//! Data anonymization
//!
//! Strips keys from nested data (deleting them or overwriting their values)
//! and alters values through redaction callbacks. Works on JSON mappings,
//! sequences of mappings and column tables.
//!
//! # Usage
//!
//! ```rust,ignore
//! use api_template::anonymization::{AnonymizationConfig, Anonymizer, ChangeRule};
//! use api_template::anonymization::redaction::{Redaction, EmailRedaction};
//!
//! let config = AnonymizationConfig::default()
//!     .with_strip(["password"])
//!     .with_change(ChangeRule::new(["email"], Redaction::Email(EmailRedaction::default())));
//! let anonymized = Anonymizer::new(config)?.anonymize_value(document)?;
//! ```

pub mod config;
pub mod engine;
pub mod matcher;
pub mod redaction;
pub mod table;

pub use config::{AnonymizationConfig, ChangeRule, Conversion};
pub use engine::{Anonymizer, Data};
pub use matcher::KeyMatcher;
pub use redaction::{Alteration, Redaction};
pub use table::Table;
