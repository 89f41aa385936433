//! Email address redaction

use super::{value_kind, Alteration};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@([A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,})$")
            .expect("email pattern is valid")
    })
}

/// Replaces the local part of an email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailRedaction {
    pub overwrite_local_part: String,
}

impl Default for EmailRedaction {
    fn default() -> Self {
        Self {
            overwrite_local_part: "anonymized".to_string(),
        }
    }
}

impl EmailRedaction {
    /// Redact an email address; invalid addresses come back unchanged
    pub fn redact(&self, email: &str) -> String {
        let trimmed = email.trim();
        match email_pattern().captures(trimmed).and_then(|c| c.get(1)) {
            Some(domain) => format!(
                "{}@{}",
                self.overwrite_local_part,
                domain.as_str().to_lowercase()
            ),
            None => {
                tracing::warn!("Email address is not valid, returning the original value");
                email.to_string()
            }
        }
    }
}

impl Alteration for EmailRedaction {
    fn alter(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.redact(s)),
            other => {
                tracing::warn!(
                    kind = value_kind(other),
                    "Email redaction expects a string, value left unchanged"
                );
                other.clone()
            }
        }
    }
}
