//! Redaction callbacks
//!
//! Partial redactions applied to single values by change rules. Each built-in
//! is a small parameter struct with a typed `redact` method plus an
//! [`Alteration`] impl that works on JSON values.

pub mod date;
pub mod email;
pub mod iban;
pub mod ipv4;
pub mod postal_code;

pub use date::DateRedaction;
pub use email::EmailRedaction;
pub use iban::IbanRedaction;
pub use ipv4::Ipv4Redaction;
pub use postal_code::PostalCodeRedaction;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Trait for value alterations used by change rules
pub trait Alteration: Send + Sync {
    /// Return the altered replacement for `value`
    ///
    /// Values an alteration cannot handle are returned unchanged.
    fn alter(&self, value: &Value) -> Value;
}

/// User supplied alteration
#[derive(Clone)]
pub struct CustomRedaction(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl CustomRedaction {
    /// Wrap a closure as an alteration
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomRedaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRedaction(..)")
    }
}

/// Redaction selected by a change rule
///
/// Serialized with a `kind` tag so rules can live in a TOML file:
///
/// ```toml
/// [[change]]
/// keys = ["plz", "postalcode"]
/// conversion = "string"
///
/// [change.redaction]
/// kind = "postal_code"
/// change_last_n = 2
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Redaction {
    PostalCode(PostalCodeRedaction),
    Date(DateRedaction),
    Ipv4(Ipv4Redaction),
    Iban(IbanRedaction),
    Email(EmailRedaction),
    /// Closure-based alteration, only constructible from code
    #[serde(skip)]
    Custom(CustomRedaction),
}

impl Redaction {
    /// Build a closure-based redaction
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::Custom(CustomRedaction::new(f))
    }
}

impl Alteration for Redaction {
    fn alter(&self, value: &Value) -> Value {
        match self {
            Redaction::PostalCode(r) => r.alter(value),
            Redaction::Date(r) => r.alter(value),
            Redaction::Ipv4(r) => r.alter(value),
            Redaction::Iban(r) => r.alter(value),
            Redaction::Email(r) => r.alter(value),
            Redaction::Custom(r) => (r.0)(value),
        }
    }
}

/// Short name of a JSON value's type, used in warnings and errors
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
