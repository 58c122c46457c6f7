// =====================================================================
// File: snapshot/tests.rs
//
// Description:
//   Unit tests for snapshot capture, materialization and the
//   latest-at-or-before lookup used by RESTORE.
// =====================================================================

// =================================================================
// Capture
// =================================================================
#[cfg(test)]
mod capture_tests {
    use crate::snapshot::{Snapshot, SnapshotField};
    use crate::store::FieldStore;
    use crate::ttl::TTLManager;

    fn field(value: &str, remaining_ttl: Option<i64>) -> SnapshotField {
        SnapshotField {
            value: value.to_string(),
            remaining_ttl,
        }
    }

    #[test]
    fn capture_records_remaining_ttl() {
        let mut store = FieldStore::default();
        let mut ttl = TTLManager::new();
        store.set("A", "B", "C", 1);
        ttl.set_expiration("A", "B", 11);
        store.set("A", "D", "E", 4);

        let snap = Snapshot::capture(&store, &ttl, 5);

        assert_eq!(snap.taken_at, 5);
        assert_eq!(snap.record_count(), 1);
        assert_eq!(snap.field_count(), 2);
        assert_eq!(snap.records["A"]["B"], field("C", Some(6)));
        assert_eq!(snap.records["A"]["D"], field("E", None));
    }

    #[test]
    fn capture_skips_elapsed_fields_and_empty_records() {
        let mut store = FieldStore::default();
        let mut ttl = TTLManager::new();
        store.set("gone", "f", "v", 0);
        ttl.set_expiration("gone", "f", 5);
        store.set("kept", "f", "v", 0);

        let snap = Snapshot::capture(&store, &ttl, 5);

        assert!(!snap.records.contains_key("gone"));
        assert_eq!(snap.record_count(), 1);
    }

    #[test]
    fn capture_of_empty_store_is_empty() {
        let snap = Snapshot::capture(&FieldStore::default(), &TTLManager::new(), 42);
        assert_eq!(snap.record_count(), 0);
        assert_eq!(snap.field_count(), 0);
    }
}

// =================================================================
// Materialize
// =================================================================
#[cfg(test)]
mod materialize_tests {
    use crate::snapshot::Snapshot;
    use crate::store::{FieldEntry, FieldStore};
    use crate::ttl::TTLManager;

    #[test]
    fn materialize_reanchors_ttl_to_restore_time() {
        let mut store = FieldStore::default();
        let mut ttl = TTLManager::new();
        store.set("A", "B", "C", 1);
        ttl.set_expiration("A", "B", 11);
        store.set("A", "D", "E", 4);

        let snap = Snapshot::capture(&store, &ttl, 5);
        let (restored, restored_ttl) = snap.materialize(10, 2);

        assert_eq!(restored.get("A", "B"), Some(&FieldEntry::new("C", 10)));
        assert_eq!(restored.get("A", "D"), Some(&FieldEntry::new("E", 10)));
        assert_eq!(restored_ttl.expiration("A", "B"), Some(16));
        assert!(!restored_ttl.has_entry("A", "D"));
    }

    #[test]
    fn materialize_does_not_touch_the_snapshot() {
        let mut store = FieldStore::default();
        store.set("k", "f", "v", 0);
        let snap = Snapshot::capture(&store, &TTLManager::new(), 1);

        let (first, _) = snap.materialize(2, 2);
        let (second, _) = snap.materialize(3, 2);

        assert_eq!(first.value("k", "f"), Some("v"));
        assert_eq!(second.get("k", "f").map(|e| e.set_at), Some(3));
        assert_eq!(snap.field_count(), 1);
    }
}

// =================================================================
// Snapshot log
// =================================================================
#[cfg(test)]
mod snapshot_log_tests {
    use crate::snapshot::{Snapshot, SnapshotLog};

    fn empty_at(t: i64) -> Snapshot {
        Snapshot {
            taken_at: t,
            ..Snapshot::default()
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log = SnapshotLog::new();
        assert_eq!(log.count(), 0);
        assert!(log.latest_at_or_before(i64::MAX).is_none());
    }

    #[test]
    fn lookup_picks_latest_not_after() {
        let mut log = SnapshotLog::new();
        for t in [9, 3, 5] {
            log.record(empty_at(t));
        }
        assert_eq!(log.times(), vec![3, 5, 9]);
        assert_eq!(log.latest_at_or_before(3).map(|s| s.taken_at), Some(3));
        assert_eq!(log.latest_at_or_before(4).map(|s| s.taken_at), Some(3));
        assert_eq!(log.latest_at_or_before(8).map(|s| s.taken_at), Some(5));
        assert_eq!(log.latest_at_or_before(100).map(|s| s.taken_at), Some(9));
        assert!(log.latest_at_or_before(2).is_none());
    }

    #[test]
    fn same_time_backup_replaces_previous() {
        let mut log = SnapshotLog::new();
        log.record(empty_at(4));

        let mut newer = empty_at(4);
        newer.records.insert("k".into(), Default::default());
        log.record(newer);

        assert_eq!(log.count(), 1);
        assert_eq!(log.latest_at_or_before(4).map(|s| s.record_count()), Some(1));
    }
}
