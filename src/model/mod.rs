//! Data models for gpsync.
//!
//! This module contains the domain models:
//! - RemoteItem (wire record from the listing endpoint)
//! - MediaItem (the reduced projection used downstream)
//! - CaptureDay
//! - Cohort
//! - ArchiveJob
//! - MediaFilter / DateRange

pub mod cohort;
pub mod filter;
pub mod media;

pub use cohort::{ArchiveJob, Cohort};
pub use filter::{DateRange, MediaFilter, MediaKind};
pub use media::{CaptureDay, MediaItem, RemoteItem};
