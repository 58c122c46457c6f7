// =====================================================================
// File: store/field_store.rs
//
// Description:
//   `FieldStore` maps keys to records. It knows nothing about time:
//   every call here reads or writes exactly what it is told. Expiry is
//   layered on top by `Database`.
//
// Notes:
//   * A record exists only while it has at least one field. Every path
//     that removes fields prunes the record when it empties.
// =====================================================================
use std::collections::HashMap;

use crate::clock::Timestamp;
use crate::index::DEFAULT_DEGREE;

use super::record::{FieldEntry, Record};

/// Key -> record mapping.
#[derive(Debug, Clone)]
pub struct FieldStore {
    records: HashMap<String, Record>,
    /// B-tree degree handed to new records.
    degree: usize,
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new(DEFAULT_DEGREE)
    }
}

impl FieldStore {
    pub fn new(degree: usize) -> Self {
        Self {
            records: HashMap::new(),
            degree,
        }
    }

    /// Insert or overwrite `field` under `key`, creating the record if needed.
    ///
    /// # Example
    /// ```
    /// use timed_kv::FieldStore;
    /// let mut store = FieldStore::default();
    /// store.set("A", "B", "E", 0);
    /// assert_eq!(store.value("A", "B"), Some("E"));
    /// ```
    pub fn set(&mut self, key: &str, field: &str, value: &str, set_at: Timestamp) {
        let degree = self.degree;
        self.records
            .entry(key.to_string())
            .or_insert_with(|| Record::new(degree))
            .set(field, FieldEntry::new(value, set_at));
    }

    pub fn get(&self, key: &str, field: &str) -> Option<&FieldEntry> {
        self.records.get(key)?.get(field)
    }

    /// Value of `field` under `key`, if both exist.
    pub fn value(&self, key: &str, field: &str) -> Option<&str> {
        self.get(key, field).map(|entry| entry.value.as_str())
    }

    /// Remove one field. The record goes too once it has no fields left.
    /// Returns `false` when the key or the field did not exist.
    pub fn delete(&mut self, key: &str, field: &str) -> bool {
        let Some(record) = self.records.get_mut(key) else {
            return false;
        };
        let removed = record.remove(field);
        if record.is_empty() {
            self.records.remove(key);
        }
        removed
    }

    /// Remove several fields of one key at once, pruning the record if it
    /// empties. Returns how many fields were actually removed.
    pub fn delete_fields(&mut self, key: &str, fields: &[String]) -> usize {
        let Some(record) = self.records.get_mut(key) else {
            return 0;
        };
        let removed = fields.iter().filter(|field| record.remove(field)).count();
        if record.is_empty() {
            self.records.remove(key);
        }
        removed
    }

    pub fn record(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Number of records, all of which are non-empty.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Every record, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records.iter().map(|(key, record)| (key.as_str(), record))
    }
}
