//! # timed_kv
//! An in-memory, time-aware key-value store.
//!
//! ## Features
//! - Records addressed by key, each holding an ordered map of fields
//! - Point lookups and (prefix) scans with sorted, formatted output
//! - Per-field time-to-live driven by a caller-supplied logical clock
//! - Point-in-time BACKUP / RESTORE that carries remaining lifespans
//!
//! ## Usage
//! The binary in `main.rs` wraps the REPL and script runner defined here.
//! Library users drive a [`Database`] directly or go through
//! [`Query`] for the array-of-strings command surface.
// =====================================================================
// File: lib.rs
//
//   This module implements the line-oriented front end that accepts
//   the following commands:
//
//     `SET <key> <field> <value>`                  -> ""
//     `GET <key> <field>`                          -> value or ""
//     `DELETE <key> <field>`                       -> true / false
//     `SCAN <key>`                                 -> f1(v1), f2(v2), ...
//     `SCAN_BY_PREFIX <key> <prefix>`              -> filtered scan
//     `SET_AT <key> <field> <value> <t>`           -> ""
//     `SET_AT_WITH_TTL <key> <field> <value> <t> <ttl>` -> ""
//     `GET_AT <key> <field> <t>`                   -> value or ""
//     `DELETE_AT <key> <field> <t>`                -> "true" / "false"
//     `SCAN_AT <key> <t>`                          -> scan at time t
//     `SCAN_BY_PREFIX_AT <key> <prefix> <t>`       -> prefix scan at t
//     `BACKUP <t>`                                 -> record count
//     `RESTORE <t> <tRestore>`                     -> ""
//     `EXIT` / `QUIT`                              -> terminate
//
//   Empty results print as an empty line; failures print `ERR <reason>`.
// =====================================================================
pub mod clock;
pub use clock::{ClockPolicy, LogicalClock, Timestamp};

pub mod config;
pub use config::DatabaseConfig;

pub mod error;
pub use error::{DbError, QueryError};

pub mod index;
pub use index::{BTreeIndex, BTreeNode};

pub mod store;
pub use store::{FieldEntry, FieldStore};

pub mod ttl;
pub use ttl::TTLManager;

pub mod snapshot;
pub use snapshot::{Snapshot, SnapshotLog};

pub mod database;
pub use database::Database;

pub mod query;
pub use query::{run_queries, Query, Reply};

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

/// Result of handling a single user command.
///
/// - `Continue` means the REPL should keep running.
/// - `Exit` means the REPL should break out and terminate.
pub enum CommandResult {
    Continue,
    Exit,
}

/// Read–Evaluate–Print Loop (REPL) over standard input.
///
/// Runs until EOF or `EXIT` / `QUIT`. Blank lines and lines starting with
/// `#` are ignored.
///
/// # Example
/// ```no_run
/// use timed_kv::{Database, repl_loop};
///
/// let mut db = Database::new();
/// repl_loop(&mut db).unwrap(); // <- waits for user input interactively
/// ```
pub fn repl_loop(db: &mut Database) -> io::Result<()> {
    let stdin = io::stdin();
    run_lines(stdin.lock(), db)
}

/// Run every command in the file at `path`, printing each reply.
///
/// Stops early at `EXIT` / `QUIT`. Blank lines and `#` comments are
/// skipped.
pub fn run_script(path: impl AsRef<Path>, db: &mut Database) -> io::Result<()> {
    let path = path.as_ref();
    info!(path = %path.display(), "running script");
    let file = File::open(path)?;
    run_lines(BufReader::new(file), db)
}

/// Feed lines from `reader` through [`handle_command`].
pub fn run_lines<R: BufRead>(reader: R, db: &mut Database) -> io::Result<()> {
    for input_line in reader.lines() {
        let line = input_line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (cmd, args) = parse_command(trimmed);
        if let CommandResult::Exit = handle_command(&cmd, &args, db) {
            break;
        }
    }
    Ok(())
}

/// Parses a raw input line into a command and its arguments.
///
/// The first token is treated as the command (normalized to uppercase),
/// and the remaining tokens are collected as arguments. Leading and
/// trailing whitespace is ignored.
pub fn parse_command(line: &str) -> (String, Vec<String>) {
    // Segment the command segments - handles repeated whitespace
    let mut command_segments = line.split_whitespace();
    // Pull out the command to normalize if lowercase is used
    let cmd = command_segments.next().unwrap_or("").to_uppercase();
    let args: Vec<String> = command_segments.map(|s| s.to_string()).collect();

    (cmd, args)
}

/// Handles a single user command, prints its reply and returns whether
/// the REPL should continue or exit.
pub fn handle_command(cmd: &str, args: &[String], db: &mut Database) -> CommandResult {
    match cmd {
        "EXIT" | "QUIT" => CommandResult::Exit,

        // Nothing to run
        "" => CommandResult::Continue,

        _ => {
            println!("{}", respond(cmd, args, db));
            CommandResult::Continue
        }
    }
}

/// Run one command and render the line the REPL would print for it.
pub fn respond(cmd: &str, args: &[String], db: &mut Database) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(cmd.to_string());
    parts.extend_from_slice(args);

    match Query::parse(&parts).and_then(|query| query.execute(db).map_err(QueryError::from)) {
        Ok(reply) => reply.to_string(),
        Err(e) => {
            debug!(command = cmd, error = %e, "command failed");
            format!("ERR {}", e)
        }
    }
}

// =================================================================
// lib.rs Unit tests
// =================================================================
