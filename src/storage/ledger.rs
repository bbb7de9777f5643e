//! SQLite-backed Ledger Store.
//!
//! The ledger is the single source of truth for "already downloaded".
//! Entries are created on the first successful transfer for a day and only
//! ever grow afterwards; nothing here deletes or rewrites identifiers.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::CaptureDay;
use crate::storage::schema::apply_schema;

/// Persistent mapping from capture day to transferred identifiers.
///
/// Implementations are handed to the sync engine by reference; there is no
/// process-wide ledger.
pub trait LedgerStore {
    /// Identifiers recorded for `day`. Empty if the day has no entry.
    ///
    /// Never fails: a read error is reported and treated as "nothing
    /// recorded", which can only cause a redundant download.
    fn get(&self, day: CaptureDay) -> BTreeSet<String>;

    /// Union `ids` into the entry for `day`, creating it if absent.
    ///
    /// Each call is a single durable write: either all of `ids` are
    /// committed or none are.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be committed. Previously
    /// committed entries are unaffected.
    fn merge(&self, day: CaptureDay, ids: &[String]) -> Result<MergeOutcome>;

    /// Whether `id` is recorded under any day.
    fn contains_identifier(&self, id: &str) -> bool;
}

/// Result of a single `merge`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Identifiers that were not recorded before this merge.
    pub added: usize,
    /// Size of the day's identifier set after the merge.
    pub total: usize,
}

/// One ledger record in its logical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub day: CaptureDay,
    pub ids: BTreeSet<String>,
}

/// Summary counts over the whole ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub days: usize,
    pub ids: usize,
}

/// SQLite implementation of [`LedgerStore`].
#[derive(Debug)]
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Open a ledger at the given path, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a ledger with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(timeout_ms.unwrap_or(5000)))?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory ledger (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Run `f` inside an IMMEDIATE transaction, committing on success.
    ///
    /// The transaction is rolled back when `f` fails.
    fn write<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Identifiers for `day`, propagating read errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn try_get(&self, day: CaptureDay) -> Result<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT media_id FROM ledger_ids WHERE day = ?1")?;
        let ids = stmt
            .query_map([day.to_string()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<BTreeSet<_>>>()?;
        Ok(ids)
    }

    /// The day an identifier is recorded under, if any.
    ///
    /// When an identifier was recorded under several days (its capture day
    /// changed remotely between runs) the earliest one is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn day_of(&self, id: &str) -> Result<Option<CaptureDay>> {
        let day: Option<String> = self
            .conn
            .query_row(
                "SELECT day FROM ledger_ids WHERE media_id = ?1 ORDER BY day LIMIT 1",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(day.and_then(|d| d.parse().ok()))
    }

    /// All entries, ordered by day.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.day, i.media_id
             FROM ledger_days d
             LEFT JOIN ledger_ids i ON i.day = d.day
             ORDER BY d.day, i.media_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut entries: Vec<LedgerEntry> = Vec::new();
        for (day, id) in rows {
            let Ok(day) = day.parse::<CaptureDay>() else {
                warn!(day, "Skipping ledger row with unparsable day");
                continue;
            };
            if entries.last().is_none_or(|e| e.day != day) {
                entries.push(LedgerEntry {
                    day,
                    ids: BTreeSet::new(),
                });
            }
            if let (Some(entry), Some(id)) = (entries.last_mut(), id) {
                entry.ids.insert(id);
            }
        }
        Ok(entries)
    }

    /// Count days and identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn stats(&self) -> Result<LedgerStats> {
        let days: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ledger_days", [], |row| row.get(0))?;
        let ids: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ledger_ids", [], |row| row.get(0))?;
        Ok(LedgerStats {
            days: usize::try_from(days).unwrap_or(0),
            ids: usize::try_from(ids).unwrap_or(0),
        })
    }
}

impl LedgerStore for SqliteLedger {
    fn get(&self, day: CaptureDay) -> BTreeSet<String> {
        self.try_get(day).unwrap_or_else(|e| {
            warn!(%day, error = %e, "Ledger read failed, treating day as not downloaded");
            BTreeSet::new()
        })
    }

    fn merge(&self, day: CaptureDay, ids: &[String]) -> Result<MergeOutcome> {
        let now = chrono::Utc::now().timestamp_millis();
        let day_key = day.to_string();

        let outcome = self.write(|tx| {
            tx.execute(
                "INSERT INTO ledger_days (day, created_at, updated_at) VALUES (?1, ?2, ?2)
                 ON CONFLICT(day) DO UPDATE SET updated_at = excluded.updated_at",
                rusqlite::params![day_key, now],
            )?;

            let mut added = 0;
            {
                let mut insert = tx.prepare_cached(
                    "INSERT OR IGNORE INTO ledger_ids (day, media_id, added_at) VALUES (?1, ?2, ?3)",
                )?;
                for id in ids {
                    added += insert.execute(rusqlite::params![day_key, id, now])?;
                }
            }

            let total: i64 = tx.query_row(
                "SELECT COUNT(*) FROM ledger_ids WHERE day = ?1",
                [&day_key],
                |row| row.get(0),
            )?;

            Ok(MergeOutcome {
                added,
                total: usize::try_from(total).unwrap_or(0),
            })
        })?;

        debug!(%day, added = outcome.added, total = outcome.total, "Ledger merged");
        Ok(outcome)
    }

    fn contains_identifier(&self, id: &str) -> bool {
        self.day_of(id).unwrap_or_else(|e| {
            warn!(id, error = %e, "Ledger lookup failed");
            None
        })
        .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(s: &str) -> CaptureDay {
        s.parse().unwrap()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_get_missing_day_is_empty() {
        let ledger = SqliteLedger::open_memory().unwrap();
        assert!(ledger.get(day("2024-01-05")).is_empty());
    }

    #[test]
    fn test_merge_creates_entry() {
        let ledger = SqliteLedger::open_memory().unwrap();
        let outcome = ledger.merge(day("2024-01-05"), &ids(&["a", "b"])).unwrap();

        assert_eq!(outcome, MergeOutcome { added: 2, total: 2 });
        let expected: BTreeSet<String> = ids(&["a", "b"]).into_iter().collect();
        assert_eq!(ledger.get(day("2024-01-05")), expected);
    }

    #[test]
    fn test_merge_is_set_union() {
        let ledger = SqliteLedger::open_memory().unwrap();
        ledger.merge(day("2024-01-05"), &ids(&["a", "b"])).unwrap();
        let outcome = ledger.merge(day("2024-01-05"), &ids(&["b", "c"])).unwrap();

        assert_eq!(outcome, MergeOutcome { added: 1, total: 3 });
        let got: Vec<_> = ledger.get(day("2024-01-05")).into_iter().collect();
        assert_eq!(got, ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_merge_dedups_within_one_call() {
        let ledger = SqliteLedger::open_memory().unwrap();
        let outcome = ledger.merge(day("2024-01-05"), &ids(&["a", "a", "a"])).unwrap();
        assert_eq!(outcome, MergeOutcome { added: 1, total: 1 });
    }

    #[test]
    fn test_days_are_independent() {
        let ledger = SqliteLedger::open_memory().unwrap();
        ledger.merge(day("2024-01-05"), &ids(&["a"])).unwrap();
        ledger.merge(day("2024-01-06"), &ids(&["b", "c"])).unwrap();

        assert_eq!(ledger.get(day("2024-01-05")).len(), 1);
        assert_eq!(ledger.get(day("2024-01-06")).len(), 2);
        assert_eq!(ledger.stats().unwrap(), LedgerStats { days: 2, ids: 3 });
    }

    #[test]
    fn test_contains_identifier_across_days() {
        let ledger = SqliteLedger::open_memory().unwrap();
        ledger.merge(day("2024-01-05"), &ids(&["a"])).unwrap();
        ledger.merge(day("2024-01-07"), &ids(&["z"])).unwrap();

        assert!(ledger.contains_identifier("a"));
        assert!(ledger.contains_identifier("z"));
        assert!(!ledger.contains_identifier("nope"));
        assert_eq!(ledger.day_of("z").unwrap(), Some(day("2024-01-07")));
    }

    #[test]
    fn test_entries_grouped_and_ordered() {
        let ledger = SqliteLedger::open_memory().unwrap();
        ledger.merge(day("2024-03-02"), &ids(&["d"])).unwrap();
        ledger.merge(day("2024-03-01"), &ids(&["c", "a", "b"])).unwrap();

        let entries = ledger.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].day, day("2024-03-01"));
        assert_eq!(entries[0].ids.len(), 3);
        assert_eq!(entries[1].day, day("2024-03-02"));
    }

    #[test]
    fn test_empty_merge_still_records_day() {
        let ledger = SqliteLedger::open_memory().unwrap();
        let outcome = ledger.merge(day("2024-01-05"), &[]).unwrap();
        assert_eq!(outcome.total, 0);
        assert_eq!(ledger.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("ledger.db");

        {
            let ledger = SqliteLedger::open(&path).unwrap();
            ledger.merge(day("2024-01-05"), &ids(&["a", "b"])).unwrap();
        }

        let reopened = SqliteLedger::open(&path).unwrap();
        assert_eq!(reopened.get(day("2024-01-05")).len(), 2);
    }
}
