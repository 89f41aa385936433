//! INI document access
//!
//! Thin wrapper over the `config` crate's INI format that keeps the parsed
//! file as sections of string options, editable in place and exportable as
//! a JSON dictionary.

use crate::anonymization::{AnonymizationConfig, Anonymizer};
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use config::{Config, File, FileFormat};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Keys hidden by [`IniDocument::to_dict_anon_default`]
pub const DEFAULT_EXCLUDE: &[&str] = &["pwd", "password", "secret"];

/// Parsed INI file
///
/// Option names are stored lowercase; section lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    /// Parse an INI file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_str(&contents)
    }

    /// Parse INI text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self> {
        let raw: BTreeMap<String, Value> = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Ini))
            .build()?
            .try_deserialize()?;

        // The config crate lowercases keys; section names keep the file's spelling
        let headers = section_headers(contents);

        let mut doc = Self::default();
        for (section, options) in raw {
            let section = headers
                .iter()
                .find(|h| h.eq_ignore_ascii_case(&section))
                .cloned()
                .unwrap_or(section);
            match options {
                Value::Object(options) => {
                    for (option, value) in options {
                        doc.set(&section, &option, &value_to_string(value));
                    }
                }
                _ => tracing::debug!(key = %section, "Ignoring option outside of a section"),
            }
        }
        Ok(doc)
    }

    /// Merge a file into this document; options in the file win
    pub fn merge_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let other = Self::from_path(path)?;
        for (section, options) in other.sections {
            for (option, value) in options {
                self.set(&section, &option, &value);
            }
        }
        Ok(())
    }

    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.section(section)?
            .get(&option.to_lowercase())
            .map(String::as_str)
    }

    /// Set an option, creating the section when needed
    pub fn set(&mut self, section: &str, option: &str, value: &str) {
        let key = self
            .section_key(section)
            .unwrap_or_else(|| section.to_string());
        self.sections
            .entry(key)
            .or_default()
            .insert(option.to_lowercase(), value.to_string());
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.section_key(section).is_some()
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn section(&self, section: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(&self.section_key(section)?)
    }

    /// Document as `{section: {option: value}}`
    pub fn to_dict(&self) -> Value {
        let map: Map<String, Value> = self
            .sections
            .iter()
            .map(|(section, options)| {
                let options: Map<String, Value> = options
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                (section.clone(), Value::Object(options))
            })
            .collect();
        Value::Object(map)
    }

    /// Document dictionary with sensitive options set to null
    ///
    /// In wild mode an option is hidden when its name contains any of the
    /// `exclude` fragments, ignoring case.
    pub fn to_dict_anon<S: AsRef<str>>(&self, exclude: &[S], wild: bool) -> Result<Value> {
        let config = AnonymizationConfig::default()
            .with_strip(exclude.iter().map(|s| s.as_ref().to_string()))
            .with_overwrite(Value::Null)
            .wild(wild);
        let anonymized = Anonymizer::new(config)?.anonymize_value(self.to_dict())?;
        Ok(anonymized)
    }

    /// [`to_dict_anon`](Self::to_dict_anon) with [`DEFAULT_EXCLUDE`] in wild mode
    pub fn to_dict_anon_default(&self) -> Result<Value> {
        self.to_dict_anon(DEFAULT_EXCLUDE, true)
    }

    fn section_key(&self, section: &str) -> Option<String> {
        self.sections
            .keys()
            .find(|k| k.eq_ignore_ascii_case(section))
            .cloned()
    }
}

/// Section names as written in `[...]` headers
fn section_headers(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('[')?.strip_suffix(']'))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = "\
[API]
ID = 7
DEBUG = false

[DB]
HOST = localhost
DB_PASSWORD = hunter2
";

    #[test]
    fn test_get_is_case_insensitive() {
        let doc = IniDocument::from_str(SAMPLE).unwrap();
        assert_eq!(doc.get("API", "ID"), Some("7"));
        assert_eq!(doc.get("api", "id"), Some("7"));
        assert_eq!(doc.get("Db", "Host"), Some("localhost"));
        assert_eq!(doc.get("API", "missing"), None);
        assert_eq!(doc.get("MISSING", "id"), None);
    }

    #[test]
    fn test_section_names_keep_their_case() {
        let doc = IniDocument::from_str("[API]\nID = 1\n[Folder]\nIN = /x\n").unwrap();
        assert_eq!(doc.sections().collect::<Vec<_>>(), vec!["API", "Folder"]);
        assert_eq!(
            doc.to_dict(),
            json!({"API": {"id": "1"}, "Folder": {"in": "/x"}})
        );
    }

    #[test]
    fn test_section_headers() {
        let headers = section_headers("; [comment]\n[ API ]\nID = 1\n[]\n  [DB]\n");
        assert_eq!(headers, vec!["API", "DB"]);
    }

    #[test]
    fn test_set_existing_and_new_section() {
        let mut doc = IniDocument::from_str(SAMPLE).unwrap();
        doc.set("api", "VERSION", "1.2.3");
        doc.set("EXTRA", "key", "value");
        assert_eq!(doc.get("API", "version"), Some("1.2.3"));
        assert_eq!(doc.get("extra", "KEY"), Some("value"));
        assert_eq!(doc.sections().count(), 3);
    }

    #[test]
    fn test_to_dict() {
        let mut doc = IniDocument::default();
        doc.set("S", "a", "1");
        assert_eq!(doc.to_dict(), json!({"S": {"a": "1"}}));
    }

    #[test]
    fn test_to_dict_anon_wild() {
        let doc = IniDocument::from_str(SAMPLE).unwrap();
        let dict = doc.to_dict_anon_default().unwrap();
        let db = dict
            .as_object()
            .and_then(|m| m.iter().find(|(k, _)| k.eq_ignore_ascii_case("db")))
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(db["db_password"], Value::Null);
        assert_eq!(db["host"], json!("localhost"));
    }

    #[test]
    fn test_to_dict_anon_exact() {
        let mut doc = IniDocument::default();
        doc.set("S", "password", "x");
        doc.set("S", "db_password", "y");
        let dict = doc.to_dict_anon(&["password"], false).unwrap();
        assert_eq!(dict, json!({"S": {"password": null, "db_password": "y"}}));
    }

    #[test]
    fn test_merge_path() {
        let mut doc = IniDocument::from_str(SAMPLE).unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[API]\nID = 9\n").unwrap();
        doc.merge_path(file.path()).unwrap();
        assert_eq!(doc.get("API", "ID"), Some("9"));
        assert_eq!(doc.get("API", "DEBUG"), Some("false"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = IniDocument::from_path("/nonexistent/config.ini");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
