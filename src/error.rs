// =====================================================================
// File: error.rs
//
// Description:
//   Error kinds surfaced by the database and the query dispatcher.
//   Missing keys and fields are not errors; they come back as the
//   empty string or `false`.
// =====================================================================
use thiserror::Error;

use crate::clock::Timestamp;

/// Failures of time-aware database operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    /// `RESTORE` asked for a point in time older than every backup.
    #[error("no backup exists at or before timestamp {restore_to}")]
    NoSnapshot { restore_to: Timestamp },

    /// A timestamp went backwards under the strict clock policy.
    #[error("timestamp {given} is earlier than the latest admitted timestamp {latest}")]
    ClockRegression { latest: Timestamp, given: Timestamp },

    /// A negative time-to-live under the strict clock policy.
    #[error("ttl must not be negative, got {ttl}")]
    NegativeTtl { ttl: i64 },
}

/// Failures turning an array of strings into a database call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("empty query")]
    Empty,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("wrong number of arguments for '{command}' command, expected {expected}")]
    WrongArgCount { command: String, expected: usize },

    #[error("invalid integer '{argument}' for '{command}' command")]
    InvalidInteger { command: String, argument: String },

    #[error(transparent)]
    Database(#[from] DbError),
}
