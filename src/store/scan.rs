// =====================================================================
// File: store/scan.rs
//
// Description:
//   Ordered scans over one record, rendered as
//
//     field1(value1), field2(value2), ...
//
//   Fields come straight out of the record's B-tree, so they are
//   already sorted by name. A missing key renders as the empty string.
// =====================================================================
use super::field_store::FieldStore;
use super::record::FieldEntry;

/// Separator between rendered fields.
pub const FIELD_SEPARATOR: &str = ", ";

/// Render `(field, entry)` pairs as `field(value), ...` in the order given.
pub fn format_fields<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a FieldEntry)>,
{
    fields
        .into_iter()
        .map(|(field, entry)| format!("{}({})", field, entry.value))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

impl FieldStore {
    /// All fields of `key`, sorted by name.
    ///
    /// # Example
    /// ```
    /// use timed_kv::FieldStore;
    /// let mut store = FieldStore::default();
    /// store.set("A", "C", "F", 0);
    /// store.set("A", "B", "E", 0);
    /// assert_eq!(store.scan("A"), "B(E), C(F)");
    /// assert_eq!(store.scan("missing"), "");
    /// ```
    pub fn scan(&self, key: &str) -> String {
        self.record(key)
            .map(|record| format_fields(record.fields()))
            .unwrap_or_default()
    }

    /// Fields of `key` whose name starts with `prefix`, sorted by name.
    /// An empty prefix is the same as [`scan`](Self::scan).
    pub fn scan_by_prefix(&self, key: &str, prefix: &str) -> String {
        self.record(key)
            .map(|record| format_fields(record.fields_with_prefix(prefix)))
            .unwrap_or_default()
    }
}
