//! gpsync - incremental downloader for a GoPro cloud media library
//!
//! This crate provides the core functionality for the `gpsync` CLI tool:
//! list the remote library, group items by capture day, and download one
//! zip archive per day that the local ledger does not already cover.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (MediaItem, CaptureDay, Cohort, ArchiveJob, MediaFilter)
//! - [`storage`] - SQLite download ledger
//! - [`remote`] - Media library trait and its HTTP client
//! - [`sync`] - Pagination, reconciliation and archive download
//! - [`config`] - Path resolution and config file
//! - [`validate`] - Argument validation
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod remote;
pub mod storage;
pub mod sync;
pub mod validate;

pub use error::{Error, Result};
