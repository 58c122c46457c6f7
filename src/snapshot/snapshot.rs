// =====================================================================
// File: snapshot/snapshot.rs
//
// Description:
//   A `Snapshot` is the state of the store captured by `BACKUP`: every
//   visible field with its value and the lifespan it had left at the
//   moment of the backup. Absolute expiry times are never stored, so a
//   snapshot can be replayed at any later logical time.
//
//   `SnapshotLog` keeps snapshots ordered by backup time and answers
//   "latest backup at or before t" for `RESTORE`.
// =====================================================================
use std::collections::BTreeMap;

use crate::clock::Timestamp;
use crate::store::{FieldStore, Record};
use crate::ttl::TTLManager;

/// One captured field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotField {
    pub value: String,
    /// Lifespan left at backup time, `None` for fields without a TTL.
    pub remaining_ttl: Option<i64>,
}

/// Store contents captured at one backup time, grouped by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub taken_at: Timestamp,
    pub records: BTreeMap<String, BTreeMap<String, SnapshotField>>,
}

impl Snapshot {
    /// Capture `store` as seen at `taken_at`.
    ///
    /// The caller is expected to have evicted expired fields first; any
    /// field still carrying an elapsed TTL is skipped so it can never be
    /// brought back.
    pub fn capture(store: &FieldStore, ttl: &TTLManager, taken_at: Timestamp) -> Self {
        let mut records = BTreeMap::new();

        for (key, record) in store.records() {
            let fields = Self::capture_record(key, record, ttl, taken_at);
            if !fields.is_empty() {
                records.insert(key.to_string(), fields);
            }
        }

        Self { taken_at, records }
    }

    fn capture_record(
        key: &str,
        record: &Record,
        ttl: &TTLManager,
        taken_at: Timestamp,
    ) -> BTreeMap<String, SnapshotField> {
        record
            .fields()
            .into_iter()
            .filter_map(|(field, entry)| {
                let remaining_ttl = ttl.remaining(key, field, taken_at);
                if remaining_ttl.is_some_and(|left| left <= 0) {
                    return None;
                }
                Some((
                    field.to_string(),
                    SnapshotField {
                        value: entry.value.clone(),
                        remaining_ttl,
                    },
                ))
            })
            .collect()
    }

    /// Number of non-empty records captured.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Total number of captured fields.
    pub fn field_count(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    /// Rebuild a field store and TTL index from this snapshot as of
    /// `restore_at`.
    ///
    /// Every field is stamped `set_at = restore_at`; fields that had a TTL
    /// expire at `restore_at + remaining_ttl`.
    pub fn materialize(&self, restore_at: Timestamp, degree: usize) -> (FieldStore, TTLManager) {
        let mut store = FieldStore::new(degree);
        let mut ttl = TTLManager::new();

        for (key, fields) in &self.records {
            for (field, captured) in fields {
                store.set(key, field, &captured.value, restore_at);
                if let Some(left) = captured.remaining_ttl {
                    ttl.set_expiration(key, field, restore_at.saturating_add(left));
                }
            }
        }

        (store, ttl)
    }
}

/// Snapshots ordered by backup time.
#[derive(Debug, Clone, Default)]
pub struct SnapshotLog {
    snapshots: BTreeMap<Timestamp, Snapshot>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self {
            snapshots: BTreeMap::new(),
        }
    }

    /// Store `snapshot` under its backup time, replacing any snapshot
    /// already taken at that time.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.snapshots.insert(snapshot.taken_at, snapshot);
    }

    /// The snapshot with the greatest backup time `<= at`.
    ///
    /// # Example
    /// ```
    /// use timed_kv::snapshot::{Snapshot, SnapshotLog};
    ///
    /// let mut log = SnapshotLog::new();
    /// for t in [3, 5, 9] {
    ///     log.record(Snapshot { taken_at: t, ..Snapshot::default() });
    /// }
    /// assert_eq!(log.latest_at_or_before(7).map(|s| s.taken_at), Some(5));
    /// assert_eq!(log.latest_at_or_before(9).map(|s| s.taken_at), Some(9));
    /// assert!(log.latest_at_or_before(2).is_none());
    /// ```
    pub fn latest_at_or_before(&self, at: Timestamp) -> Option<&Snapshot> {
        self.snapshots.range(..=at).next_back().map(|(_, snapshot)| snapshot)
    }

    /// Backup times in ascending order.
    pub fn times(&self) -> Vec<Timestamp> {
        self.snapshots.keys().copied().collect()
    }

    /// Number of stored snapshots.
    pub fn count(&self) -> usize {
        self.snapshots.len()
    }
}
