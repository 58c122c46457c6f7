// =====================================================================
// File: store/mod.rs
//
//! The `store` module is the time-unaware base layer: records of
//! named fields plus ordered scans over them.
//!
//! Structure:
//! - `record.rs`      : [`FieldEntry`] and [`Record`].
//! - `field_store.rs` : [`FieldStore`], key -> record CRUD.
//! - `scan.rs`        : `scan` / `scan_by_prefix` and result formatting.
//! - `tests.rs`       : Unit tests.
// =====================================================================

pub mod field_store;
pub mod record;
pub mod scan;

pub use self::field_store::FieldStore;
pub use self::record::{FieldEntry, Record};
pub use self::scan::format_fields;
