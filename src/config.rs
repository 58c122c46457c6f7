// =====================================================================
// File: config.rs
//
// Description:
//   Runtime settings for a `Database`. Built with chained `with_*` calls
//   or read from the environment by the binary.
//
//     TIMED_KV_CLOCK         strict | lenient   (default strict)
//     TIMED_KV_INDEX_DEGREE  B-tree minimum degree, >= 2 (default 2)
// =====================================================================
use tracing::warn;

use crate::clock::ClockPolicy;
use crate::index::DEFAULT_DEGREE;

/// Environment variable selecting the clock policy.
pub const CLOCK_ENV: &str = "TIMED_KV_CLOCK";

/// Environment variable selecting the field index degree.
pub const INDEX_DEGREE_ENV: &str = "TIMED_KV_INDEX_DEGREE";

/// Settings for a [`Database`](crate::Database).
///
/// # Example
/// ```
/// use timed_kv::{ClockPolicy, DatabaseConfig};
///
/// let config = DatabaseConfig::default()
///     .with_clock_policy(ClockPolicy::Lenient)
///     .with_index_degree(4);
/// assert_eq!(config.index_degree, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// What to do with regressing timestamps and negative TTLs.
    pub clock_policy: ClockPolicy,
    /// Minimum degree of each record's field B-tree.
    pub index_degree: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            clock_policy: ClockPolicy::Strict,
            index_degree: DEFAULT_DEGREE,
        }
    }
}

impl DatabaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock_policy(mut self, policy: ClockPolicy) -> Self {
        self.clock_policy = policy;
        self
    }

    /// Degrees below 2 are raised to 2.
    pub fn with_index_degree(mut self, degree: usize) -> Self {
        self.index_degree = degree.max(DEFAULT_DEGREE);
        self
    }

    /// Defaults overridden by `TIMED_KV_CLOCK` and `TIMED_KV_INDEX_DEGREE`.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(CLOCK_ENV) {
            match ClockPolicy::parse(&raw) {
                Some(policy) => config = config.with_clock_policy(policy),
                None => warn!(value = %raw, "ignoring unknown {}", CLOCK_ENV),
            }
        }

        if let Some(raw) = lookup(INDEX_DEGREE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(degree) => config = config.with_index_degree(degree),
                Err(_) => warn!(value = %raw, "ignoring invalid {}", INDEX_DEGREE_ENV),
            }
        }

        config
    }
}
