//! Key matching for strip and change rules

/// Matches object keys or table columns against a set of patterns
///
/// In exact mode a key matches when it equals a pattern. In wild mode a key
/// matches when it contains a pattern, ignoring case.
#[derive(Debug, Clone, Default)]
pub struct KeyMatcher {
    patterns: Vec<String>,
    wild: bool,
}

impl KeyMatcher {
    pub fn new<I, S>(patterns: I, wild: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                if wild {
                    p.as_ref().to_lowercase()
                } else {
                    p.as_ref().to_string()
                }
            })
            .collect();
        Self { patterns, wild }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_wild(&self) -> bool {
        self.wild
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, key: &str) -> bool {
        if self.wild {
            let key = key.to_lowercase();
            self.patterns.iter().any(|p| key.contains(p.as_str()))
        } else {
            self.patterns.iter().any(|p| p == key)
        }
    }
}
