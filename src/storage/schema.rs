//! Ledger database schema.
//!
//! The logical shape is one record per capture day holding the set of
//! identifiers already transferred for that day. It is stored normalized:
//! `ledger_days` is keyed by day, `ledger_ids` holds one row per
//! (day, identifier) pair so set semantics come from the primary key.

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the ledger database.
///
/// Timestamps are INTEGER Unix milliseconds.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- One row per capture day that has ever been merged.
CREATE TABLE IF NOT EXISTS ledger_days (
    day TEXT PRIMARY KEY,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Identifiers already transferred, grouped by day. Rows are only ever added.
CREATE TABLE IF NOT EXISTS ledger_ids (
    day TEXT NOT NULL,
    media_id TEXT NOT NULL,
    added_at INTEGER NOT NULL,
    PRIMARY KEY (day, media_id),
    FOREIGN KEY (day) REFERENCES ledger_days(day)
);

CREATE INDEX IF NOT EXISTS idx_ledger_ids_media ON ledger_ids(media_id);
";

/// Apply pragmas and schema to a connection.
///
/// Idempotent; safe to call on every open.
///
/// # Errors
///
/// Returns an error if a pragma or DDL statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    // Each merge must be durable once its transaction commits.
    conn.pragma_update(None, "synchronous", "FULL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}
