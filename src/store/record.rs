// =====================================================================
// File: store/record.rs
//
// Description:
//   A record is the set of fields stored under one key. Fields live in
//   a `BTreeIndex` so they are always ordered by name.
// =====================================================================
use crate::clock::Timestamp;
use crate::index::BTreeIndex;

/// A field's value plus the logical time it was last written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub value: String,
    pub set_at: Timestamp,
}

impl FieldEntry {
    pub fn new(value: impl Into<String>, set_at: Timestamp) -> Self {
        Self {
            value: value.into(),
            set_at,
        }
    }
}

/// Fields of one key, ordered by field name.
#[derive(Debug, Clone)]
pub struct Record {
    fields: BTreeIndex<FieldEntry>,
}

impl Record {
    pub fn new(degree: usize) -> Self {
        Self {
            fields: BTreeIndex::new(degree),
        }
    }

    /// Insert or overwrite a field.
    pub fn set(&mut self, field: &str, entry: FieldEntry) {
        self.fields.insert(field.to_string(), entry);
    }

    pub fn get(&self, field: &str) -> Option<&FieldEntry> {
        self.fields.search(field)
    }

    /// Remove a field, returning `true` if it existed.
    pub fn remove(&mut self, field: &str) -> bool {
        self.fields.remove(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in ascending name order.
    pub fn fields(&self) -> Vec<(&str, &FieldEntry)> {
        self.fields.entries()
    }

    /// Fields whose name starts with `prefix`, ascending.
    pub fn fields_with_prefix(&self, prefix: &str) -> Vec<(&str, &FieldEntry)> {
        self.fields.entries_with_prefix(prefix)
    }
}
