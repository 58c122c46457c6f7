// =====================================================================
// File: clock.rs
//
//! Logical time. Callers pass a timestamp with every time-aware command
//! and the database remembers the latest one it admitted. Nothing here
//! reads the wall clock.
// =====================================================================
use tracing::warn;

use crate::error::DbError;

/// Caller-supplied logical time. TTLs use the same unit.
pub type Timestamp = i64;

/// How the clock treats a timestamp older than the latest admitted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockPolicy {
    /// Reject regressing timestamps and negative TTLs.
    #[default]
    Strict,
    /// Accept anything; ordering is the caller's responsibility.
    Lenient,
}

impl ClockPolicy {
    /// Parse `strict` / `lenient` (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "lenient" => Some(Self::Lenient),
            _ => None,
        }
    }
}

/// Tracks the latest timestamp seen by a time-aware operation.
#[derive(Debug, Clone, Default)]
pub struct LogicalClock {
    policy: ClockPolicy,
    latest: Option<Timestamp>,
}

impl LogicalClock {
    pub fn new(policy: ClockPolicy) -> Self {
        Self { policy, latest: None }
    }

    pub fn policy(&self) -> ClockPolicy {
        self.policy
    }

    /// Latest admitted timestamp, if any.
    pub fn latest(&self) -> Option<Timestamp> {
        self.latest
    }

    /// Timestamp given to untimed writes: the latest admitted one, or 0.
    pub fn now(&self) -> Timestamp {
        self.latest.unwrap_or(0)
    }

    /// Check `t` against the policy without recording it.
    ///
    /// Equal timestamps are fine; only going backwards is a regression.
    pub fn check(&self, t: Timestamp) -> Result<(), DbError> {
        match (self.policy, self.latest) {
            (ClockPolicy::Strict, Some(latest)) if t < latest => {
                warn!(latest, given = t, "rejected regressing timestamp");
                Err(DbError::ClockRegression { latest, given: t })
            }
            _ => Ok(()),
        }
    }

    /// Record `t` as observed. The latest value never moves backwards.
    pub fn advance(&mut self, t: Timestamp) {
        self.latest = Some(self.latest.map_or(t, |latest| latest.max(t)));
    }
}
