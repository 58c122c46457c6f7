// =====================================================================
// File: ttl/manager.rs
//
//! The [`TTLManager`] keeps an expiry time for individual fields,
//! addressed by `(key, field)`. Times are logical timestamps supplied
//! by the caller.
//!
//! Expiration is lazy: nothing is removed until a caller asks for the
//! expired fields of a key (or of the whole store) at some timestamp.
// =====================================================================

use std::collections::HashMap;

use crate::clock::Timestamp;

/// Expiry metadata for fields in the store.
///
/// A field with no entry here never expires. A field is expired at `now`
/// once `now >= expires_at`.
#[derive(Debug, Default, Clone)]
pub struct TTLManager {
    expirations: HashMap<String, HashMap<String, Timestamp>>,
}

impl TTLManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self {
            expirations: HashMap::new(),
        }
    }

    /// Install or overwrite the expiry time of `(key, field)`.
    ///
    /// Times in the past are accepted; such a field is simply expired at
    /// the next check.
    ///
    /// # Example
    /// ```
    /// use timed_kv::ttl::TTLManager;
    /// let mut ttl = TTLManager::new();
    /// ttl.set_expiration("A", "B", 11);
    /// assert_eq!(ttl.expiration("A", "B"), Some(11));
    /// ```
    pub fn set_expiration(&mut self, key: &str, field: &str, expires_at: Timestamp) {
        self.expirations
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), expires_at);
    }

    /// Absolute expiry time of `(key, field)`, if one is set.
    pub fn expiration(&self, key: &str, field: &str) -> Option<Timestamp> {
        self.expirations.get(key)?.get(field).copied()
    }

    /// Lifespan left for `(key, field)` at `now`.
    ///
    /// # Returns
    /// * `None` if the field has no TTL.
    /// * `Some(n)` with `n = expires_at - now`, saturating at the `i64`
    ///   bounds; zero or negative means the field is already expired.
    ///
    /// # Example
    /// ```
    /// use timed_kv::ttl::TTLManager;
    /// let mut ttl = TTLManager::new();
    /// ttl.set_expiration("A", "B", 11);
    /// assert_eq!(ttl.remaining("A", "B", 3), Some(8));
    /// assert_eq!(ttl.remaining("A", "C", 3), None);
    /// ```
    pub fn remaining(&self, key: &str, field: &str, now: Timestamp) -> Option<i64> {
        self.expiration(key, field).map(|expires_at| expires_at.saturating_sub(now))
    }

    /// Remove the TTL of `(key, field)`, making the field persistent.
    ///
    /// # Returns
    /// * `true` if a TTL existed and was removed.
    /// * `false` if the field had none.
    pub fn clear_expiration(&mut self, key: &str, field: &str) -> bool {
        let Some(fields) = self.expirations.get_mut(key) else {
            return false;
        };
        let removed = fields.remove(field).is_some();
        if fields.is_empty() {
            self.expirations.remove(key);
        }
        removed
    }

    /// Remove and return, sorted by name, the fields of `key` whose TTL has
    /// elapsed at `now`. The key's entry is dropped once it has no TTLs left.
    ///
    /// # Example
    /// ```
    /// use timed_kv::ttl::TTLManager;
    /// let mut ttl = TTLManager::new();
    /// ttl.set_expiration("A", "B", 10);
    /// ttl.set_expiration("A", "C", 20);
    /// assert_eq!(ttl.drain_expired("A", 10), vec!["B".to_string()]);
    /// assert_eq!(ttl.active_count(), 1);
    /// ```
    pub fn drain_expired(&mut self, key: &str, now: Timestamp) -> Vec<String> {
        let Some(fields) = self.expirations.get_mut(key) else {
            return Vec::new();
        };

        let mut expired: Vec<String> = fields
            .iter()
            .filter(|&(_, &expires_at)| now >= expires_at)
            .map(|(field, _)| field.clone())
            .collect();
        for field in &expired {
            fields.remove(field);
        }
        if fields.is_empty() {
            self.expirations.remove(key);
        }

        expired.sort();
        expired
    }

    /// [`drain_expired`](Self::drain_expired) for every tracked key.
    /// Returns `(key, fields)` pairs sorted by key; keys with nothing
    /// expired are left out.
    pub fn drain_all_expired(&mut self, now: Timestamp) -> Vec<(String, Vec<String>)> {
        let mut keys: Vec<String> = self.expirations.keys().cloned().collect();
        keys.sort();

        keys.into_iter()
            .filter_map(|key| {
                let expired = self.drain_expired(&key, now);
                (!expired.is_empty()).then_some((key, expired))
            })
            .collect()
    }

    /// Total number of `(key, field)` pairs with a TTL.
    pub fn active_count(&self) -> usize {
        self.expirations.values().map(HashMap::len).sum()
    }

    /// `true` if `(key, field)` currently has a TTL entry, expired or not.
    pub fn has_entry(&self, key: &str, field: &str) -> bool {
        self.expiration(key, field).is_some()
    }
}
