// ============================================================
// File: main.rs
//
// Description:
//   Entry point for the timed key-value store.
//
//     timed-kv               -> interactive REPL on stdin
//     timed-kv <script>      -> run the commands in <script>
//
//   Replies go to standard output, one line per command, so the
//   program can be black-box tested. Logs go to standard error and
//   are filtered with RUST_LOG (default: warn). The clock policy and
//   B-tree degree come from TIMED_KV_CLOCK / TIMED_KV_INDEX_DEGREE.
// ============================================================
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use timed_kv::{Database, DatabaseConfig, repl_loop, run_script};

fn main() -> Result<()> {
    init_tracing();

    let config = DatabaseConfig::from_env();
    tracing::info!(
        clock = ?config.clock_policy,
        degree = config.index_degree,
        "starting timed-kv"
    );
    let mut db = Database::with_config(config);

    match std::env::args().nth(1) {
        Some(path) => run_script(&path, &mut db)
            .with_context(|| format!("failed to run script '{}'", path))?,
        None => repl_loop(&mut db).context("failed to read from stdin")?,
    }

    Ok(())
}

/// Log to stderr so stdout carries nothing but command replies.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
