//! Sync run: listing, reconciliation and archive download.
//!
//! A run proceeds in two phases:
//!
//! 1. **Listing**: every page of the remote listing is read and items are
//!    grouped by capture day into cohorts ([`cohort`]).
//! 2. **Reconciliation**: cohorts are visited in ascending day order. Each
//!    is compared with the ledger ([`reconcile`]); cohorts that need it are
//!    streamed to `{day}_{n}_GoPro.zip` ([`fetch`]) and then merged into the
//!    ledger.
//!
//! Listing failures abort the run. A failed archive only fails its own day.
//!
//! # Example
//!
//! ```ignore
//! use gpsync::sync::{NoProgress, SyncEngine, SyncOptions};
//!
//! let engine = SyncEngine::new(&client, &ledger, &NoProgress, SyncOptions::new("downloads"));
//! let report = engine.run().await?;
//! println!("{} fetched, {} skipped", report.fetched(), report.skipped());
//! ```

pub mod cohort;
pub mod engine;
pub mod fetch;
pub mod file;
pub mod progress;
pub mod reconcile;
pub mod types;

pub use cohort::{CohortSet, group_by_day};
pub use engine::SyncEngine;
pub use fetch::ArchiveFetcher;
pub use file::{atomic_write, unique_archive_path};
pub use progress::{NoProgress, ProgressSink, TerminalProgress};
pub use reconcile::{Decision, decide};
pub use types::{
    CohortReport, CohortStatus, DEFAULT_CHUNK_SIZE, DEFAULT_PER_PAGE, FetchOutcome, LedgerUpdate,
    SyncOptions, SyncReport,
};
