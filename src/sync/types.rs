//! Sync run options and report types.

use std::path::PathBuf;

use serde::Serialize;

use crate::model::{CaptureDay, MediaFilter};
use crate::storage::MergeOutcome;

/// Default listing page size.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Default streamed write size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Settings for one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub filter: MediaFilter,
    pub per_page: u32,
    pub chunk_size: usize,
    pub output_dir: PathBuf,
    /// Reconcile only; never download or touch the ledger.
    pub dry_run: bool,
}

impl SyncOptions {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            filter: MediaFilter::default(),
            per_page: DEFAULT_PER_PAGE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_dir: output_dir.into(),
            dry_run: false,
        }
    }
}

/// What happened to the ledger after a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LedgerUpdate {
    Merged(MergeOutcome),
    /// The archive is on disk but the day was not recorded; it will be
    /// downloaded again next run.
    Failed { error: String },
}

/// A completed archive transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    pub path: PathBuf,
    pub bytes_written: u64,
    pub ledger: LedgerUpdate,
}

/// Per-cohort result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CohortStatus {
    /// Ledger already holds as many identifiers as were listed.
    Skipped,
    /// Would be fetched (dry run).
    Planned,
    Fetched(FetchOutcome),
    /// Transfer failed; ledger untouched for this day.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortReport {
    pub day: CaptureDay,
    pub items: usize,
    pub recorded: usize,
    pub declared_bytes: u64,
    /// Listed items not recorded for this day but recorded under another.
    pub cross_day_duplicates: usize,
    #[serde(flatten)]
    pub status: CohortStatus,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub pages_read: u32,
    pub total_pages: u32,
    pub items_listed: usize,
    pub cohorts: Vec<CohortReport>,
}

impl SyncReport {
    fn count(&self, pred: impl Fn(&CohortStatus) -> bool) -> usize {
        self.cohorts.iter().filter(|c| pred(&c.status)).count()
    }

    #[must_use]
    pub fn fetched(&self) -> usize {
        self.count(|s| matches!(s, CohortStatus::Fetched(_)))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, CohortStatus::Skipped))
    }

    #[must_use]
    pub fn planned(&self) -> usize {
        self.count(|s| matches!(s, CohortStatus::Planned))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, CohortStatus::Failed { .. }))
    }

    /// Fetched cohorts whose ledger merge failed.
    #[must_use]
    pub fn ledger_failures(&self) -> usize {
        self.count(|s| {
            matches!(
                s,
                CohortStatus::Fetched(FetchOutcome {
                    ledger: LedgerUpdate::Failed { .. },
                    ..
                })
            )
        })
    }

    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.cohorts
            .iter()
            .map(|c| match &c.status {
                CohortStatus::Fetched(outcome) => outcome.bytes_written,
                _ => 0,
            })
            .sum()
    }

    /// True when every cohort either was skipped or fully succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.ledger_failures() == 0
    }
}
