// =====================================================================
// File: query.rs
//
// Description:
//   Turns an array-of-strings query (`["SET_AT", "A", "B", "C", "1"]`)
//   into a typed `Query`, runs it against a `Database` and renders the
//   result as a `Reply`.
//
//   Command names are case-insensitive. Argument counts are exact and
//   timestamps / TTLs must parse as `i64`.
// =====================================================================
use std::fmt;

use crate::clock::Timestamp;
use crate::database::Database;
use crate::error::{DbError, QueryError};

/// One parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Set { key: String, field: String, value: String },
    Get { key: String, field: String },
    Delete { key: String, field: String },
    Scan { key: String },
    ScanByPrefix { key: String, prefix: String },
    SetAt { key: String, field: String, value: String, t: Timestamp },
    SetAtWithTtl { key: String, field: String, value: String, t: Timestamp, ttl: i64 },
    GetAt { key: String, field: String, t: Timestamp },
    DeleteAt { key: String, field: String, t: Timestamp },
    ScanAt { key: String, t: Timestamp },
    ScanByPrefixAt { key: String, prefix: String, t: Timestamp },
    Backup { t: Timestamp },
    Restore { t: Timestamp, restore_to: Timestamp },
}

/// Result of a successful query.
///
/// `DELETE` answers with a real boolean while `DELETE_AT` answers with the
/// strings "true"/"false"; both print the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Flag(bool),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Text(text) => write!(f, "{}", text),
            Reply::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

impl Query {
    /// Parse a query. The first element names the command, the rest are
    /// its arguments.
    ///
    /// # Example
    /// ```
    /// use timed_kv::Query;
    ///
    /// let parts: Vec<String> = ["get_at", "A", "B", "7"].iter().map(|s| s.to_string()).collect();
    /// let query = Query::parse(&parts).unwrap();
    /// assert_eq!(query, Query::GetAt { key: "A".into(), field: "B".into(), t: 7 });
    /// ```
    pub fn parse(parts: &[String]) -> Result<Self, QueryError> {
        let Some((name, args)) = parts.split_first() else {
            return Err(QueryError::Empty);
        };
        let command = name.to_ascii_uppercase();

        let query = match command.as_str() {
            "SET" => {
                let [key, field, value] = expect_args::<3>(&command, args)?;
                Query::Set { key, field, value }
            }
            "GET" => {
                let [key, field] = expect_args::<2>(&command, args)?;
                Query::Get { key, field }
            }
            "DELETE" => {
                let [key, field] = expect_args::<2>(&command, args)?;
                Query::Delete { key, field }
            }
            "SCAN" => {
                let [key] = expect_args::<1>(&command, args)?;
                Query::Scan { key }
            }
            "SCAN_BY_PREFIX" => {
                let [key, prefix] = expect_args::<2>(&command, args)?;
                Query::ScanByPrefix { key, prefix }
            }
            "SET_AT" => {
                let [key, field, value, t] = expect_args::<4>(&command, args)?;
                let t = parse_int(&command, &t)?;
                Query::SetAt { key, field, value, t }
            }
            "SET_AT_WITH_TTL" => {
                let [key, field, value, t, ttl] = expect_args::<5>(&command, args)?;
                let t = parse_int(&command, &t)?;
                let ttl = parse_int(&command, &ttl)?;
                Query::SetAtWithTtl { key, field, value, t, ttl }
            }
            "GET_AT" => {
                let [key, field, t] = expect_args::<3>(&command, args)?;
                let t = parse_int(&command, &t)?;
                Query::GetAt { key, field, t }
            }
            "DELETE_AT" => {
                let [key, field, t] = expect_args::<3>(&command, args)?;
                let t = parse_int(&command, &t)?;
                Query::DeleteAt { key, field, t }
            }
            "SCAN_AT" => {
                let [key, t] = expect_args::<2>(&command, args)?;
                let t = parse_int(&command, &t)?;
                Query::ScanAt { key, t }
            }
            "SCAN_BY_PREFIX_AT" => {
                let [key, prefix, t] = expect_args::<3>(&command, args)?;
                let t = parse_int(&command, &t)?;
                Query::ScanByPrefixAt { key, prefix, t }
            }
            "BACKUP" => {
                let [t] = expect_args::<1>(&command, args)?;
                Query::Backup { t: parse_int(&command, &t)? }
            }
            "RESTORE" => {
                let [t, restore_to] = expect_args::<2>(&command, args)?;
                let t = parse_int(&command, &t)?;
                let restore_to = parse_int(&command, &restore_to)?;
                Query::Restore { t, restore_to }
            }
            _ => return Err(QueryError::UnknownCommand(command)),
        };

        Ok(query)
    }

    /// Run this query against `db`.
    pub fn execute(&self, db: &mut Database) -> Result<Reply, DbError> {
        let reply = match self {
            Query::Set { key, field, value } => Reply::Text(db.set(key, field, value)),
            Query::Get { key, field } => Reply::Text(db.get(key, field)),
            Query::Delete { key, field } => Reply::Flag(db.delete(key, field)),
            Query::Scan { key } => Reply::Text(db.scan(key)),
            Query::ScanByPrefix { key, prefix } => Reply::Text(db.scan_by_prefix(key, prefix)),
            Query::SetAt { key, field, value, t } => Reply::Text(db.set_at(key, field, value, *t)?),
            Query::SetAtWithTtl { key, field, value, t, ttl } => {
                Reply::Text(db.set_at_with_ttl(key, field, value, *t, *ttl)?)
            }
            Query::GetAt { key, field, t } => Reply::Text(db.get_at(key, field, *t)?),
            Query::DeleteAt { key, field, t } => Reply::Text(db.delete_at(key, field, *t)?),
            Query::ScanAt { key, t } => Reply::Text(db.scan_at(key, *t)?),
            Query::ScanByPrefixAt { key, prefix, t } => Reply::Text(db.scan_by_prefix_at(key, prefix, *t)?),
            Query::Backup { t } => Reply::Text(db.backup(*t)?),
            Query::Restore { t, restore_to } => Reply::Text(db.restore(*t, *restore_to)?),
        };
        Ok(reply)
    }
}

/// Parse and run every query in order. A failing query yields an `Err` in
/// its slot and the batch keeps going.
pub fn run_queries(db: &mut Database, queries: &[Vec<String>]) -> Vec<Result<Reply, QueryError>> {
    queries
        .iter()
        .map(|parts| -> Result<Reply, QueryError> {
            let query = Query::parse(parts)?;
            Ok(query.execute(db)?)
        })
        .collect()
}

fn expect_args<const N: usize>(command: &str, args: &[String]) -> Result<[String; N], QueryError> {
    <[String; N]>::try_from(args.to_vec()).map_err(|_| QueryError::WrongArgCount {
        command: command.to_string(),
        expected: N,
    })
}

fn parse_int(command: &str, raw: &str) -> Result<i64, QueryError> {
    raw.parse::<i64>().map_err(|_| QueryError::InvalidInteger {
        command: command.to_string(),
        argument: raw.to_string(),
    })
}
