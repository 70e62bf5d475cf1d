//! In-memory presentation store, filled from JSON record files.

use slidepack_core::{Error, PresentationRecord, PresentationStore, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Records keyed by presentation id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, PresentationRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: PresentationRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Parse a JSON document holding one record or an array of records.
    pub fn load_json(&mut self, json: &str) -> Result<usize> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        let records: Vec<PresentationRecord> = if value.is_array() {
            serde_json::from_value(value)
        } else {
            serde_json::from_value(value).map(|r| vec![r])
        }
        .map_err(|e| Error::Serialization(e.to_string()))?;

        let count = records.len();
        for record in records {
            self.insert(record);
        }
        Ok(count)
    }

    /// Load a JSON record file, see [`load_json`](Self::load_json).
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let json = fs::read_to_string(path)?;
        self.load_json(&json).map_err(|e| match e {
            Error::Serialization(msg) => {
                Error::Serialization(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PresentationStore for MemoryStore {
    fn presentation(&self, id: &str) -> Option<PresentationRecord> {
        self.records.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_single_and_array() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_json(r#"{"id": "a", "title": "A"}"#).unwrap(), 1);
        assert_eq!(
            store
                .load_json(r#"[{"id": "b", "title": null}, {"id": "c", "title": "C", "slides": []}]"#)
                .unwrap(),
            2
        );
        assert_eq!(store.ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(store.presentation("c").unwrap().title.as_deref(), Some("C"));
        assert!(store.presentation("zzz").is_none());
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let mut store = MemoryStore::new();
        let err = store.load_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(store.is_empty());
    }
}
