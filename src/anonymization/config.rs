//! Anonymization configuration
//!
//! Options can be built in code with the builder methods or loaded from a
//! TOML rules file:
//!
//! ```toml
//! strip = ["password", "token"]
//! hard_delete = false
//! overwrite_value = "#REDACTED"
//! wild_change = true
//!
//! [[change]]
//! keys = ["email"]
//! [change.redaction]
//! kind = "email"
//! ```

use crate::anonymization::redaction::{Alteration, Redaction};
use crate::domain::{AnonymizationError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Options for an [`Anonymizer`](crate::anonymization::Anonymizer) run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Keys (or key fragments in wild mode) to strip
    #[serde(default)]
    pub strip: Vec<String>,

    /// Remove stripped keys entirely instead of overwriting their values
    #[serde(default = "default_hard_delete")]
    pub hard_delete: bool,

    /// Replacement for stripped values when `hard_delete` is off
    #[serde(default)]
    pub overwrite_value: Value,

    /// Match keys case-insensitively by substring, for both strip and change
    #[serde(default)]
    pub wild_change: bool,

    /// Alterations applied to matching keys
    #[serde(default)]
    pub change: Vec<ChangeRule>,
}

fn default_hard_delete() -> bool {
    true
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            strip: Vec::new(),
            hard_delete: default_hard_delete(),
            overwrite_value: Value::Null,
            wild_change: false,
            change: Vec::new(),
        }
    }
}

impl AnonymizationConfig {
    /// Load options from a TOML rules file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            strip = config.strip.len(),
            change_rules = config.change.len(),
            "Loaded anonymization rules"
        );
        Ok(config)
    }

    /// Keys to strip
    pub fn with_strip<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Overwrite stripped values with `value` instead of deleting them
    pub fn with_overwrite(mut self, value: Value) -> Self {
        self.hard_delete = false;
        self.overwrite_value = value;
        self
    }

    /// Toggle case-insensitive substring matching
    pub fn wild(mut self, wild: bool) -> Self {
        self.wild_change = wild;
        self
    }

    /// Add a change rule
    pub fn with_change(mut self, rule: ChangeRule) -> Self {
        self.change.push(rule);
        self
    }

    /// Check that every rule can be applied
    pub fn validate(&self) -> std::result::Result<(), AnonymizationError> {
        if self.strip.iter().any(|k| k.is_empty()) {
            return Err(AnonymizationError::InvalidRule(
                "strip keys must not be empty".to_string(),
            ));
        }
        for (i, rule) in self.change.iter().enumerate() {
            if rule.keys.is_empty() {
                return Err(AnonymizationError::InvalidRule(format!(
                    "change rule {i} has no keys"
                )));
            }
            if rule.keys.iter().any(|k| k.is_empty()) {
                return Err(AnonymizationError::InvalidRule(format!(
                    "change rule {i} has an empty key"
                )));
            }
        }
        Ok(())
    }
}

/// Applies a redaction to every value under the listed keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRule {
    pub keys: Vec<String>,
    pub redaction: Redaction,
    /// Conversion applied to the value before the redaction runs
    #[serde(default)]
    pub conversion: Option<Conversion>,
}

impl ChangeRule {
    pub fn new<I, S>(keys: I, redaction: Redaction) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            redaction,
            conversion: None,
        }
    }

    pub fn with_conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = Some(conversion);
        self
    }

    /// Convert then redact a single value
    pub fn apply(&self, value: &Value) -> Value {
        match self.conversion {
            Some(conversion) => self.redaction.alter(&conversion.convert(value)),
            None => self.redaction.alter(value),
        }
    }
}

/// Type conversion run before a redaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conversion {
    /// Numbers and booleans become strings; other values pass through
    String,
}

impl Conversion {
    pub fn convert(&self, value: &Value) -> Value {
        match (self, value) {
            (Conversion::String, Value::Number(n)) => Value::String(n.to_string()),
            (Conversion::String, Value::Bool(b)) => Value::String(b.to_string()),
            (_, other) => other.clone(),
        }
    }
}
