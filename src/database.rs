// =====================================================================
// File: database.rs
//
// Description:
// Defines `Database`, the single owner of all live state: the field
// store, the TTL index, the snapshot log and the logical clock.
//
// Responsibilities:
// - Untimed CRUD and scans straight against the field store.
// - Timed operations, each passing through `admit` first: check the
//   clock, then evict the addressed key's expired fields.
// - BACKUP / RESTORE across the whole store.
//
// Return shapes follow the command surface: "" for writes, the value
// or "" for reads, `bool` for DELETE and "true"/"false" for DELETE_AT.
// =====================================================================
use tracing::{debug, info};

use crate::clock::{ClockPolicy, LogicalClock, Timestamp};
use crate::config::DatabaseConfig;
use crate::error::DbError;
use crate::snapshot::{Snapshot, SnapshotLog};
use crate::store::FieldStore;
use crate::ttl::TTLManager;

/// An in-memory, time-aware record store.
///
/// # Example
/// ```
/// use timed_kv::Database;
///
/// let mut db = Database::new();
/// db.set_at_with_ttl("A", "B", "C", 1, 10).unwrap();
/// assert_eq!(db.get_at("A", "B", 10).unwrap(), "C");
/// assert_eq!(db.get_at("A", "B", 11).unwrap(), "");
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    store: FieldStore,
    ttl: TTLManager,
    snapshots: SnapshotLog,
    clock: LogicalClock,
    config: DatabaseConfig,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Empty database with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DatabaseConfig::default())
    }

    pub fn with_config(config: DatabaseConfig) -> Self {
        Self {
            store: FieldStore::new(config.index_degree),
            ttl: TTLManager::new(),
            snapshots: SnapshotLog::new(),
            clock: LogicalClock::new(config.clock_policy),
            config,
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Read-only view of the live field store.
    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// Read-only view of the live TTL index.
    pub fn ttl(&self) -> &TTLManager {
        &self.ttl
    }

    /// Latest timestamp admitted by a timed operation.
    pub fn latest_timestamp(&self) -> Option<Timestamp> {
        self.clock.latest()
    }

    // =========================
    // Untimed operations
    // =========================

    /// SET: insert or overwrite a field. Always returns "".
    ///
    /// The entry is stamped with the latest admitted timestamp. An existing
    /// TTL on the field is left as it is.
    pub fn set(&mut self, key: &str, field: &str, value: &str) -> String {
        self.store.set(key, field, value, self.clock.now());
        String::new()
    }

    /// GET: the field's value, or "" if the key or field is missing.
    pub fn get(&self, key: &str, field: &str) -> String {
        self.store.value(key, field).unwrap_or_default().to_string()
    }

    /// DELETE: remove a field, `true` iff it existed. Its TTL goes with it
    /// so a later write to the same name starts clean.
    pub fn delete(&mut self, key: &str, field: &str) -> bool {
        let removed = self.store.delete(key, field);
        if removed {
            self.ttl.clear_expiration(key, field);
        }
        removed
    }

    /// SCAN: every field of `key` as `f1(v1), f2(v2), ...`, sorted.
    pub fn scan(&self, key: &str) -> String {
        self.store.scan(key)
    }

    /// SCAN_BY_PREFIX: like [`scan`](Self::scan), limited to field names
    /// starting with `prefix`.
    pub fn scan_by_prefix(&self, key: &str, prefix: &str) -> String {
        self.store.scan_by_prefix(key, prefix)
    }

    // =========================
    // Admission / eviction
    // =========================

    /// The checkpoint every timed operation passes through: validate `t`
    /// against the clock, record it, then evict the expired fields of
    /// `key` as of `t`. Nothing is touched when the clock rejects `t`.
    fn admit(&mut self, key: &str, t: Timestamp) -> Result<(), DbError> {
        self.clock.check(t)?;
        self.clock.advance(t);
        self.evict_key(key, t);
        Ok(())
    }

    /// Store-wide form of [`admit`](Self::admit), used by BACKUP.
    fn admit_all(&mut self, t: Timestamp) -> Result<(), DbError> {
        self.clock.check(t)?;
        self.clock.advance(t);
        for (key, expired) in self.ttl.drain_all_expired(t) {
            self.remove_expired(&key, &expired, t);
        }
        Ok(())
    }

    fn evict_key(&mut self, key: &str, t: Timestamp) {
        let expired = self.ttl.drain_expired(key, t);
        if !expired.is_empty() {
            self.remove_expired(key, &expired, t);
        }
    }

    fn remove_expired(&mut self, key: &str, fields: &[String], t: Timestamp) {
        let removed = self.store.delete_fields(key, fields);
        debug!(key, removed, at = t, "evicted expired fields");
    }

    // =========================
    // Timed operations
    // =========================

    /// SET_AT: write `value` at time `t`. Returns "".
    ///
    /// A TTL already on the field stays in force; only
    /// [`set_at_with_ttl`](Self::set_at_with_ttl) replaces it.
    pub fn set_at(&mut self, key: &str, field: &str, value: &str, t: Timestamp) -> Result<String, DbError> {
        self.admit(key, t)?;
        self.store.set(key, field, value, t);
        Ok(String::new())
    }

    /// SET_AT_WITH_TTL: write `value` at `t`, visible during `[t, t + ttl)`.
    /// Returns "".
    ///
    /// `ttl == 0` leaves the field invisible from `t` on. A negative `ttl`
    /// is rejected under [`ClockPolicy::Strict`].
    pub fn set_at_with_ttl(
        &mut self,
        key: &str,
        field: &str,
        value: &str,
        t: Timestamp,
        ttl: i64,
    ) -> Result<String, DbError> {
        if ttl < 0 && self.clock.policy() == ClockPolicy::Strict {
            return Err(DbError::NegativeTtl { ttl });
        }
        self.admit(key, t)?;
        self.store.set(key, field, value, t);
        self.ttl.set_expiration(key, field, t.saturating_add(ttl));
        Ok(String::new())
    }

    /// GET_AT: the field's value if visible at `t`, else "".
    pub fn get_at(&mut self, key: &str, field: &str, t: Timestamp) -> Result<String, DbError> {
        self.admit(key, t)?;
        Ok(self.get(key, field))
    }

    /// DELETE_AT: remove a field visible at `t`. Returns "true" if it was
    /// removed, "false" otherwise.
    pub fn delete_at(&mut self, key: &str, field: &str, t: Timestamp) -> Result<String, DbError> {
        self.admit(key, t)?;
        Ok(self.delete(key, field).to_string())
    }

    /// SCAN_AT: the fields of `key` visible at `t`.
    pub fn scan_at(&mut self, key: &str, t: Timestamp) -> Result<String, DbError> {
        self.admit(key, t)?;
        Ok(self.scan(key))
    }

    /// SCAN_BY_PREFIX_AT: the fields of `key` visible at `t` whose name
    /// starts with `prefix`.
    pub fn scan_by_prefix_at(&mut self, key: &str, prefix: &str, t: Timestamp) -> Result<String, DbError> {
        self.admit(key, t)?;
        Ok(self.scan_by_prefix(key, prefix))
    }

    /// Lifespan left at `t` for a field visible at `t`. `None` when the
    /// field is missing, expired, or has no TTL.
    pub fn ttl_at(&mut self, key: &str, field: &str, t: Timestamp) -> Result<Option<i64>, DbError> {
        self.admit(key, t)?;
        Ok(self.ttl.remaining(key, field, t))
    }

    // =========================
    // Backup / restore
    // =========================

    /// BACKUP: evict everything expired at `t`, then save the visible
    /// fields with their remaining TTLs under `t`. A backup already taken
    /// at `t` is replaced. Returns the number of non-empty records.
    pub fn backup(&mut self, t: Timestamp) -> Result<String, DbError> {
        self.admit_all(t)?;

        let snapshot = Snapshot::capture(&self.store, &self.ttl, t);
        let records = snapshot.record_count();
        info!(at = t, records, fields = snapshot.field_count(), "backup taken");

        self.snapshots.record(snapshot);
        Ok(records.to_string())
    }

    /// RESTORE: replace the live state with the latest backup taken at or
    /// before `restore_to`. Restored fields are stamped `set_at = t` and
    /// TTLs are re-anchored as `t + remaining_ttl`, so they all expire
    /// after `t`. Returns "".
    ///
    /// # Errors
    /// [`DbError::NoSnapshot`] if no backup qualifies; live state is left
    /// untouched in that case.
    pub fn restore(&mut self, t: Timestamp, restore_to: Timestamp) -> Result<String, DbError> {
        self.clock.check(t)?;

        let snapshot = self
            .snapshots
            .latest_at_or_before(restore_to)
            .ok_or(DbError::NoSnapshot { restore_to })?;
        let (store, ttl) = snapshot.materialize(t, self.config.index_degree);
        info!(at = t, restore_to, backup = snapshot.taken_at, records = store.record_count(), "restored backup");

        self.clock.advance(t);
        self.store = store;
        self.ttl = ttl;
        Ok(String::new())
    }

    /// Number of stored backups.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.count()
    }

    /// Backup times in ascending order.
    pub fn snapshot_times(&self) -> Vec<Timestamp> {
        self.snapshots.times()
    }

    /// Number of records currently held, including ones whose fields have
    /// expired but not yet been evicted.
    pub fn record_count(&self) -> usize {
        self.store.record_count()
    }
}

// =====================================================================
// Unit Tests for Database
// =====================================================================
