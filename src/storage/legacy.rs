//! Legacy JSON ledger import.
//!
//! Earlier tooling kept the ledger in a document-store file
//! (`gopro_media_db.json`) shaped like:
//!
//! ```json
//! {"_default": {"1": {"date": "2024-03-01", "ids": ["a", "b"]}}}
//! ```
//!
//! Records are keyed by insertion counter; a day may appear more than once.
//! Parsing folds duplicates together so the result has one entry per day.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

use super::LedgerEntry;
use crate::error::{Error, Result};
use crate::model::CaptureDay;

/// Table holding ledger records in the legacy file.
const DEFAULT_TABLE: &str = "_default";

#[derive(Debug, Deserialize)]
struct LegacyRecord {
    date: String,
    #[serde(default)]
    ids: Vec<String>,
}

/// Parse a legacy ledger document into one entry per day, in day order.
///
/// A file without the default table yields no entries.
///
/// # Errors
///
/// Returns `Json` if the document is not valid JSON of the expected shape,
/// or `InvalidArgument` if a record's date is not `YYYY-MM-DD`.
pub fn parse_legacy_ledger(content: &str) -> Result<Vec<LedgerEntry>> {
    let mut tables: HashMap<String, BTreeMap<String, LegacyRecord>> = serde_json::from_str(content)?;
    let Some(records) = tables.remove(DEFAULT_TABLE) else {
        return Ok(Vec::new());
    };

    let mut by_day: BTreeMap<CaptureDay, BTreeSet<String>> = BTreeMap::new();
    for (key, record) in records {
        let day: CaptureDay = record.date.parse().map_err(|_| {
            Error::InvalidArgument(format!(
                "legacy record {key} has invalid date '{}'",
                record.date
            ))
        })?;
        by_day.entry(day).or_default().extend(record.ids);
    }

    Ok(by_day
        .into_iter()
        .map(|(day, ids)| LedgerEntry { day, ids })
        .collect())
}
