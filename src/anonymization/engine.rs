//! Anonymization engine
//!
//! Walks nested JSON data or tables and applies the configured alterations
//! and strips.
//!
//! # Order
//!
//! Change rules run first so that a key both altered and stripped ends up
//! stripped. Both passes reach every depth of mappings and sequences.
//!
//! # Examples
//!
//! ```
//! use api_template::anonymization::{AnonymizationConfig, Anonymizer};
//! use serde_json::json;
//!
//! let config = AnonymizationConfig::default().with_strip(["password"]);
//! let anonymizer = Anonymizer::new(config)?;
//!
//! let out = anonymizer.anonymize_value(json!({
//!     "user": "ann",
//!     "password": "hunter2",
//!     "nested": {"password": "again"}
//! }))?;
//! assert_eq!(out, json!({"user": "ann", "nested": {}}));
//! # Ok::<(), api_template::domain::AppError>(())
//! ```

use crate::anonymization::config::{AnonymizationConfig, ChangeRule};
use crate::anonymization::matcher::KeyMatcher;
use crate::anonymization::redaction::value_kind;
use crate::anonymization::table::Table;
use crate::domain::AnonymizationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

type EngineResult<T> = std::result::Result<T, AnonymizationError>;

/// Data accepted by the anonymizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Data {
    Table(Table),
    Json(Value),
}

struct CompiledRule {
    matcher: KeyMatcher,
    rule: ChangeRule,
}

/// Strips and alters values by key
pub struct Anonymizer {
    strip: KeyMatcher,
    hard_delete: bool,
    overwrite_value: Value,
    rules: Vec<CompiledRule>,
}

impl Anonymizer {
    /// Create an anonymizer; fails when a rule is malformed
    pub fn new(config: AnonymizationConfig) -> EngineResult<Self> {
        config.validate()?;

        let wild = config.wild_change;
        let rules = config
            .change
            .into_iter()
            .map(|rule| CompiledRule {
                matcher: KeyMatcher::new(&rule.keys, wild),
                rule,
            })
            .collect();

        Ok(Self {
            strip: KeyMatcher::new(&config.strip, wild),
            hard_delete: config.hard_delete,
            overwrite_value: config.overwrite_value,
            rules,
        })
    }

    pub fn anonymize(&self, data: Data) -> EngineResult<Data> {
        match data {
            Data::Json(value) => self.anonymize_value(value).map(Data::Json),
            Data::Table(table) => self.anonymize_table(table).map(Data::Table),
        }
    }

    /// Anonymize a mapping or a sequence of mappings
    pub fn anonymize_value(&self, value: Value) -> EngineResult<Value> {
        match value {
            Value::Object(_) => Ok(self.strip_value(self.alter_value(value))),
            Value::Array(items) => {
                if let Some(bad) = items.iter().find(|item| !item.is_object()) {
                    return Err(AnonymizationError::MixedSequence(
                        value_kind(bad).to_string(),
                    ));
                }
                Ok(Value::Array(
                    items
                        .into_iter()
                        .map(|item| self.strip_value(self.alter_value(item)))
                        .collect(),
                ))
            }
            other => Err(AnonymizationError::UnsupportedData(
                value_kind(&other).to_string(),
            )),
        }
    }

    /// Anonymize a table column by column
    pub fn anonymize_table(&self, mut table: Table) -> EngineResult<Table> {
        table.validate()?;

        for compiled in &self.rules {
            for idx in matching_columns(&table.columns, &compiled.matcher) {
                for row in &mut table.rows {
                    if let Some(cell) = row.get_mut(idx) {
                        *cell = compiled.rule.apply(cell);
                    }
                }
            }
        }

        if self.strip.is_empty() {
            return Ok(table);
        }

        let stripped = matching_columns(&table.columns, &self.strip);
        if self.hard_delete {
            let keep: Vec<usize> = (0..table.columns.len())
                .filter(|idx| !stripped.contains(idx))
                .collect();
            table.columns = keep.iter().map(|&i| table.columns[i].clone()).collect();
            for row in &mut table.rows {
                *row = keep.iter().map(|&i| row[i].clone()).collect();
            }
            tracing::debug!(dropped = stripped.len(), "Dropped table columns");
            return Ok(table);
        }

        for row in &mut table.rows {
            for &idx in &stripped {
                row[idx] = self.overwrite_value.clone();
            }
        }

        if !self.strip.is_wild() {
            let missing: Vec<String> = self
                .strip
                .patterns()
                .iter()
                .filter(|p| !table.columns.contains(*p))
                .cloned()
                .collect();
            for column in missing {
                table.columns.push(column);
                for row in &mut table.rows {
                    row.push(self.overwrite_value.clone());
                }
            }
        }

        Ok(table)
    }

    fn alter_value(&self, value: Value) -> Value {
        if self.rules.is_empty() {
            return value;
        }
        match value {
            Value::Object(map) => {
                let altered: Map<String, Value> = map
                    .into_iter()
                    .map(|(key, value)| {
                        let value = self.alter_entry(&key, value);
                        (key, value)
                    })
                    .collect();
                Value::Object(altered)
            }
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.alter_value(v)).collect())
            }
            scalar => scalar,
        }
    }

    fn alter_entry(&self, key: &str, value: Value) -> Value {
        let matching: Vec<&ChangeRule> = self
            .rules
            .iter()
            .filter(|c| c.matcher.matches(key))
            .map(|c| &c.rule)
            .collect();
        if matching.is_empty() {
            return self.alter_value(value);
        }

        match value {
            Value::Object(_) => {
                tracing::warn!(key = %key, "Change rule matched a mapping, leaving it unaltered");
                self.alter_value(value)
            }
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(_) | Value::Array(_) => self.alter_value(item),
                        scalar => apply_rules(&matching, scalar),
                    })
                    .collect(),
            ),
            scalar => apply_rules(&matching, scalar),
        }
    }

    fn strip_value(&self, value: Value) -> Value {
        if self.strip.is_empty() {
            return value;
        }
        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, value) in map {
                    if !self.strip.matches(&key) {
                        out.insert(key, self.strip_value(value));
                    } else if !self.hard_delete {
                        out.insert(key, self.overwrite_value.clone());
                    }
                }
                Value::Object(out)
            }
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.strip_value(v)).collect())
            }
            scalar => scalar,
        }
    }
}

fn apply_rules(rules: &[&ChangeRule], value: Value) -> Value {
    rules.iter().fold(value, |acc, rule| rule.apply(&acc))
}

fn matching_columns(columns: &[String], matcher: &KeyMatcher) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| matcher.matches(c))
        .map(|(i, _)| i)
        .collect()
}
