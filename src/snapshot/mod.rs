// =====================================================================
// File: snapshot/mod.rs
//
// Description:
//   Module entry point for backup/restore. Re-exports `Snapshot`, the
//   captured state of one backup, and `SnapshotLog`, the time-ordered
//   collection `RESTORE` searches.
// =====================================================================
#[allow(clippy::module_inception)]
pub mod snapshot;

pub use self::snapshot::{Snapshot, SnapshotField, SnapshotLog};

#[cfg(test)]
mod tests;
