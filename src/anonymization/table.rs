//! Column-oriented tabular data

use crate::domain::AnonymizationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A table of named columns and rows of cells
///
/// Serialized as `{"columns": [...], "rows": [[...], ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, checking that every row has one cell per column
    pub fn new(
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, AnonymizationError> {
        let table = Self { columns, rows };
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), AnonymizationError> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(AnonymizationError::InvalidTable(format!(
                    "row {i} has {} cells, expected {}",
                    row.len(),
                    self.columns.len()
                )));
            }
        }
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }

    /// Rows as a list of objects keyed by column name
    pub fn to_records(&self) -> Value {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let map: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(map)
            })
            .collect();
        Value::Array(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ragged_rows_rejected() {
        let result = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![json!(1), json!(2)], vec![json!(3)]],
        );
        assert!(matches!(result, Err(AnonymizationError::InvalidTable(_))));
    }

    #[test]
    fn test_to_records() {
        let table = Table::new(
            vec!["name".to_string(), "age".to_string()],
            vec![vec![json!("Ann"), json!(30)]],
        )
        .unwrap();
        assert_eq!(table.to_records(), json!([{"name": "Ann", "age": 30}]));
        assert_eq!(table.column("age"), Some(vec![&json!(30)]));
        assert_eq!(table.column("missing"), None);
    }

    #[test]
    fn test_deserialize() {
        let table: Table =
            serde_json::from_value(json!({"columns": ["x"], "rows": [[1], [2]]})).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.column_index("x"), Some(0));
    }
}
