use std::collections::HashMap;

/// Header table shared by requests and responses.
///
/// HTTP header names are case-insensitive, so keys are lower-cased and
/// trimmed before storage and before lookup. Inserting a duplicate name
/// overwrites the previous value (last write wins), which matches how the
/// parser treats repeated header lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: HashMap<String, String>,
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

impl Headers {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts a header, normalizing the name and trimming the value.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl AsRef<str>) {
        self.entries
            .insert(normalize(key.as_ref()), value.as_ref().trim().to_string());
    }

    /// Looks up a header by name, case/whitespace-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize(key)).map(|v| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(&normalize(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over (normalized name, value) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
