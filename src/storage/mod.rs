//! Ledger storage for gpsync.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode with full synchronous commits
//! - One transaction per merge, so a crash never leaves a half-merged day
//! - Set semantics enforced by the schema's primary key
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`ledger`] - The `LedgerStore` trait and its SQLite implementation
//! - [`legacy`] - Reader for the older JSON ledger file

pub mod ledger;
pub mod legacy;
pub mod schema;

pub use ledger::{LedgerEntry, LedgerStats, LedgerStore, MergeOutcome, SqliteLedger};
pub use legacy::parse_legacy_ledger;
