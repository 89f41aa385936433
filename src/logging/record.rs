//! Log record written by the structured logger

use super::logger::LogLevel;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

/// One structured log entry as stored by a sink
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// RFC 3339 creation time
    pub timestamp: String,
    pub api_id: i64,
    pub level: LogLevel,
    pub status_code: u16,
    pub message: Option<String>,
    /// Error source chain, only set on error records
    pub traceback: Option<String>,
    pub path: Option<String>,
    pub user: Option<String>,
    pub uuid: Option<String>,
    pub trace_id: Option<String>,
    /// Serialize `api_id`, `level` and `status_code` as strings
    pub treat_all_args_as_string: bool,
}

impl LogRecord {
    pub fn to_json_string(&self) -> String {
        // Serializing plain strings and numbers cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for LogRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("LogRecord", 10)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        if self.treat_all_args_as_string {
            state.serialize_field("api_id", &self.api_id.to_string())?;
            state.serialize_field("level", &self.level.code().to_string())?;
            state.serialize_field("status_code", &self.status_code.to_string())?;
        } else {
            state.serialize_field("api_id", &self.api_id)?;
            state.serialize_field("level", &self.level.code())?;
            state.serialize_field("status_code", &self.status_code)?;
        }
        state.serialize_field("message", &self.message)?;
        state.serialize_field("traceback", &self.traceback)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("user", &self.user)?;
        state.serialize_field("uuid", &self.uuid)?;
        state.serialize_field("trace_id", &self.trace_id)?;
        state.end()
    }
}
