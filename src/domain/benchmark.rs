//! Benchmark request/response models

use serde::{Deserialize, Serialize};

const APPEND_START: &str = "APPENDED_START_";
const APPEND_END: &str = "_APPENDED_END";

/// Nested part of the benchmark payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkNested {
    pub nested_name: String,
    pub nested_number: i64,
}

/// Benchmark payload used by the echo/append endpoint
///
/// The same shape is used for input and output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benchmark {
    pub name: String,
    pub number: i64,
    pub another_class: BenchmarkNested,
}

impl Benchmark {
    /// Returns the modified copy sent back by the append endpoint
    ///
    /// `number` is incremented and both names are wrapped in the append markers.
    /// `nested_number` is left as is.
    pub fn appended(mut self) -> Self {
        self.number = self.number.saturating_add(1);
        self.name = wrap(&self.name);
        self.another_class.nested_name = wrap(&self.another_class.nested_name);
        self
    }
}

fn wrap(value: &str) -> String {
    format!("{APPEND_START}{value}{APPEND_END}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Benchmark {
        Benchmark {
            name: "string".to_string(),
            number: 0,
            another_class: BenchmarkNested {
                nested_name: "string".to_string(),
                nested_number: 0,
            },
        }
    }

    #[test]
    fn test_appended() {
        let out = sample().appended();
        assert_eq!(out.number, 1);
        assert_eq!(out.name, "APPENDED_START_string_APPENDED_END");
        assert_eq!(
            out.another_class.nested_name,
            "APPENDED_START_string_APPENDED_END"
        );
        assert_eq!(out.another_class.nested_number, 0);
    }

    #[test]
    fn test_appended_saturates() {
        let mut input = sample();
        input.number = i64::MAX;
        assert_eq!(input.appended().number, i64::MAX);
    }

    #[test]
    fn test_deserialize_missing_nested_fails() {
        let result = serde_json::from_str::<Benchmark>(r#"{"name":"a","number":1}"#);
        assert!(result.is_err());
    }
}
