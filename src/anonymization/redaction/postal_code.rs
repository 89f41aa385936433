//! Postal code redaction

use super::{value_kind, Alteration};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Replaces the trailing characters of a postal code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalCodeRedaction {
    /// Expected length of the postal code
    pub length: usize,
    /// Only redact codes of exactly `length` characters
    pub check_length: bool,
    /// Number of trailing characters to replace (sign is ignored, 0 disables)
    pub change_last_n: i64,
    /// Replacement for each cut-off character
    pub change_with: String,
}

impl Default for PostalCodeRedaction {
    fn default() -> Self {
        Self {
            length: 5,
            check_length: true,
            change_last_n: 1,
            change_with: "0".to_string(),
        }
    }
}

impl PostalCodeRedaction {
    /// Redact a postal code string
    ///
    /// Codes failing the length check come back unchanged, as does every
    /// code when `change_last_n` is 0. A value longer than the code
    /// replaces all of it.
    pub fn redact(&self, postal_code: &str) -> String {
        let len = postal_code.chars().count();
        if self.check_length && len != self.length {
            tracing::warn!(
                postal_code = %postal_code,
                expected_length = self.length,
                "Postal code failed the length check, returning it unchanged"
            );
            return postal_code.to_string();
        }

        let n = usize::try_from(self.change_last_n.unsigned_abs()).unwrap_or(usize::MAX);
        if n == 0 {
            return postal_code.to_string();
        }

        let keep = len.saturating_sub(n);
        let mut out: String = postal_code.chars().take(keep).collect();
        out.push_str(&self.change_with.repeat(n));
        out
    }
}

impl Alteration for PostalCodeRedaction {
    fn alter(&self, value: &Value) -> Value {
        match value {
            Value::Null => Value::Null,
            Value::String(s) => Value::String(self.redact(s)),
            other => {
                tracing::warn!(
                    kind = value_kind(other),
                    "Postal code redaction expects a string, value left unchanged"
                );
                other.clone()
            }
        }
    }
}
