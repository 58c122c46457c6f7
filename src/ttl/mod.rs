// =====================================================================
// File: ttl/mod.rs
//
//! The `ttl` module tracks time-to-live metadata for fields.
//!
//! Structure:
//! - `manager.rs` : [`TTLManager`] (`set_expiration`, `remaining`,
//!                  `drain_expired`, `clear_expiration`).
//! - `tests.rs`   : Unit tests.
//!
//! The manager only records expiry times. Removing the expired values
//! from the field store is done by `Database`, which drains this index
//! and deletes what it returns.
// =====================================================================

pub mod manager;

pub use self::manager::TTLManager;
