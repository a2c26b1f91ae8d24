use crate::data::lenient;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// One entry of the index endpoint. Everything but the prefix is ignored.
#[derive(Deserialize, Debug)]
pub struct IndexEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub prefix: Option<String>,
}

impl IndexEntry {
    /// Entries that aren't objects are skipped rather than failing the index.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Self::deserialize(value).ok()
    }
}

/// Deduplicated student identifiers, in the order the API listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixIndex {
    prefixes: Vec<String>,
}

impl PrefixIndex {
    pub fn from_entries(entries: impl IntoIterator<Item = IndexEntry>) -> Self {
        Self::from_prefixes(entries.into_iter().filter_map(|entry| entry.prefix))
    }

    pub fn from_prefixes(prefixes: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let prefixes = prefixes
            .into_iter()
            .map(|prefix| prefix.trim().to_string())
            .filter(|prefix| !prefix.is_empty())
            .filter(|prefix| seen.insert(prefix.clone()))
            .collect();

        Self { prefixes }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_and_blanks_are_dropped_in_discovery_order() {
        let entries: Vec<IndexEntry> = serde_json::from_str(
            r#"[{"prefix": "cl1"}, {"prefix": "ab12", "name": "x"}, {"prefix": "cl1"}, {"prefix": ""}, {}]"#,
        )
        .unwrap();
        let index = PrefixIndex::from_entries(entries);
        assert_eq!(index.as_slice(), ["cl1", "ab12"]);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let values: Vec<Value> = serde_json::from_str(
            r#"[null, {"prefix": 123}, "ab12", {"prefix": "cd34"}, [], {"prefix": "ef56"}]"#,
        )
        .unwrap();
        let index = PrefixIndex::from_entries(values.into_iter().filter_map(IndexEntry::from_value));
        assert_eq!(index.as_slice(), ["cd34", "ef56"]);
    }

    #[test]
    fn empty_index() {
        let index = PrefixIndex::from_prefixes(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.iter().count(), 0);
    }
}
